// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Tier 2: DYNAMIC state (mutable, scoped to one solve).
//!
//! This module contains the scratch data the conflict resolver rewrites on
//! every call:
//! - Agent: current and tentative next state of each agent
//! - OccupancyTable: which agent holds each vertex now, and next step
//! - Statistics: search counters
//!
//! Occupancy writes are tracked on a trail, so clearing a table costs only
//! as much as the writes made since the last clear.

pub mod agent;
pub mod occupancy;
pub mod statistics;

pub use agent::Agent;
pub use occupancy::OccupancyTable;
pub use statistics::{Counters, Statistics};
