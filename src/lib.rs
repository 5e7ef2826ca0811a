// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Multi-agent path finding by lazy constraint addition (LaCAM).
//!
//! Many agents share a 4-connected grid. Each must visit an ordered sequence
//! of goals, and optionally pays for turning in place when its orientation is
//! modeled. The planner returns one joint configuration per time step, with
//! no two agents on the same vertex at the same time.
//!
//! # Architecture
//!
//! The implementation uses a two-tier memory model:
//!
//! ## Tier 1: MEMO Data (append-only)
//!
//! Data that only ever grows, and is never rewritten once computed:
//! - [`Graph`]: the free cells and their adjacency, built once from a map
//! - [`StateSpace`]: canonical `(vertex, orientation, goal stage)` states
//!   with lazily cached neighbor lists
//! - [`DistanceOracle`]: resumable reverse searches giving distance to goal
//!
//! ## Tier 2: DYNAMIC Data (per solve)
//!
//! Scratch state rewritten on every step of the search:
//! - agents with their current and tentative next state
//! - vertex occupancy tables, cleared through a [`trail`]
//!
//! # Search Algorithm
//!
//! The high-level search walks distinct joint configurations depth first.
//! Every configuration owns a lazily grown tree of constraints, each fixing
//! the moves of a prefix of agents; priority inheritance (PIBT) completes a
//! constraint into a collision-free successor. Revisited configurations are
//! merged, so the search is complete on finite graphs.
//!
//! # References
//!
//! - Okumura, K. (2023). "LaCAM: Search-Based Algorithm for Quick Multi-Agent
//!   Pathfinding." AAAI.
//! - Okumura, K. et al. (2022). "Priority Inheritance with Backtracking for
//!   Iterative Multi-Agent Path Finding." Artificial Intelligence.

pub mod config;
pub mod deadline;
pub mod engine;
pub mod error;
pub mod graph;
pub mod instance;
pub mod memo;
pub mod metrics;
pub mod state;
pub mod trail;

// Re-export commonly used types
pub use config::PlannerConfig;
pub use deadline::Deadline;
pub use engine::{solve, AgentId, Planner, Solution};
pub use error::{InstanceError, LoadError, SolutionError};
pub use graph::{Graph, Orientation, VertexId};
pub use instance::Instance;
pub use memo::{Configuration, DistanceOracle, Pose, StateId, StateSpace, UNREACHABLE};
