// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Tier 1: MEMO data (append-only, memoized).
//!
//! This module contains the data that only ever grows during search:
//! - StateSpace: the canonical arena of `(vertex, orientation, goal stage)`
//!   states with cached forward and reverse neighbor lists
//! - Configuration: a joint state, one canonical id per agent
//! - DistanceOracle: per-agent lazily evaluated distance tables
//!
//! Nothing here is ever rewritten or revoked once computed, which is what
//! allows identity-based equality and resumable searches.

pub mod configuration;
pub mod distance;
pub mod states;

pub use configuration::Configuration;
pub use distance::{DistanceOracle, UNREACHABLE};
pub use states::{Pose, StateId, StateSpace};
