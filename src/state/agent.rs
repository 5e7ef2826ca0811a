// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Per-step view of an agent during conflict resolution.

use crate::engine::AgentId;
use crate::memo::StateId;

/// An agent while one next configuration is being negotiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agent {
    pub id: AgentId,

    /// State in the configuration being expanded.
    pub now: StateId,

    /// Tentative next state; `None` while undecided.
    pub next: Option<StateId>,
}

impl Agent {
    pub fn new(id: AgentId, now: StateId) -> Self {
        Self {
            id,
            now,
            next: None,
        }
    }

    /// Whether a next state has been reserved for this agent.
    pub fn is_decided(&self) -> bool {
        self.next.is_some()
    }
}
