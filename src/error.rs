// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for loading, validating and checking.
//!
//! None of these are raised by the solver itself: a failed branch is an
//! ordinary `false`, an unsolvable or timed-out search an empty solution.

use std::path::PathBuf;
use thiserror::Error;

use crate::engine::AgentId;

/// Failure to build a graph or instance from external input.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("map header is missing `{0}`")]
    MissingHeader(&'static str),

    #[error("invalid value `{value}` for map header `{key}`")]
    InvalidHeader { key: &'static str, value: String },

    #[error("map has {found} rows, header declares {expected}")]
    MissingRows { expected: usize, found: usize },

    #[error("map row {row} has {found} cells, header declares {expected}")]
    ShortRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cell {index} is outside the map or blocked")]
    InvalidCell { index: usize },

    #[error("scenario provides {found} agents, {requested} requested")]
    NotEnoughAgents { requested: usize, found: usize },

    #[error("cannot place {requested} agents on {available} vertices")]
    TooManyAgents { requested: usize, available: usize },
}

/// A malformed instance, detected before solving.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    #[error("instance declares {agents} agents but has {starts} starts and {goals} goal sequences")]
    AgentCountMismatch {
        agents: usize,
        starts: usize,
        goals: usize,
    },

    #[error("agent {agent} has an empty goal sequence")]
    EmptyGoalSequence { agent: AgentId },

    #[error("agents {first} and {second} share start vertex {vertex}")]
    SharedStart {
        first: AgentId,
        second: AgentId,
        vertex: usize,
    },

    #[error("agent {agent} mixes oriented and unoriented poses")]
    MixedOrientation { agent: AgentId },

    #[error("agent {agent} refers to a state unknown to this state space")]
    UnknownState { agent: AgentId },
}

/// Why a sequence of configurations is not a valid plan for an instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolutionError {
    #[error("solution is empty")]
    Empty,

    #[error("configuration at step {step} has {found} agents, expected {expected}")]
    WrongSize {
        step: usize,
        expected: usize,
        found: usize,
    },

    #[error("agent {agent} does not begin at its start")]
    WrongStart { agent: AgentId },

    #[error("final configuration reaches {reached} goals, {threshold} required")]
    GoalsNotReached { reached: usize, threshold: usize },

    #[error("agent {agent} makes an invalid move at step {step}")]
    InvalidTransition { agent: AgentId, step: usize },

    #[error("agent {agent} has goal stage {found} at step {step}, expected {expected}")]
    WrongGoalStage {
        agent: AgentId,
        step: usize,
        expected: usize,
        found: usize,
    },

    #[error("agents {first} and {second} occupy the same vertex at step {step}")]
    VertexConflict {
        first: AgentId,
        second: AgentId,
        step: usize,
    },

    #[error("agent {follower} enters the vertex agent {leader} leaves at step {step}")]
    FollowingConflict {
        follower: AgentId,
        leader: AgentId,
        step: usize,
    },

    #[error("agents {first} and {second} swap vertices at step {step}")]
    SwapConflict {
        first: AgentId,
        second: AgentId,
        step: usize,
    },
}
