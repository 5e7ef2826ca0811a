// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Lazily evaluated, resumable distance-to-goal tables.
//!
//! Each agent gets its own reverse breadth-first search, seeded at distance 0
//! from every goal of its sequence (goal `k` as the state at stage `k`).
//! Because goal stages are part of the state, the stage layers never mix and
//! one queue serves the whole sequence.
//!
//! The search only runs as far as a query needs. Its frontier is kept between
//! calls and resumed where the previous call stopped, so the total work per
//! agent is bounded by one full search no matter how many queries are made
//! (c.f. Reverse Resumable A*).
//!
//! Values are append-only: once a state has a distance it never changes.

use std::collections::VecDeque;

use super::states::{StateId, StateSpace};
use crate::instance::Instance;

/// Returned for states from which the current goal cannot be reached.
///
/// Strictly greater than any real distance, which is bounded by the number of
/// interned states.
pub const UNREACHABLE: u32 = u32::MAX;

/// Reverse search of one agent.
#[derive(Debug, Clone)]
struct AgentDistance {
    /// Index of the last goal; queries past the end of the sequence are capped here.
    last_stage: usize,

    /// Distance per state, indexed by `StateId::index`; `None` until discovered.
    table: Vec<Option<u32>>,

    /// Discovered but not yet expanded states.
    frontier: VecDeque<StateId>,
}

impl AgentDistance {
    fn new(goals: &[StateId]) -> Self {
        let mut oracle = Self {
            last_stage: goals.len().saturating_sub(1),
            table: Vec::new(),
            frontier: VecDeque::with_capacity(goals.len()),
        };
        for &g in goals {
            if oracle.lookup(g).is_none() {
                oracle.record(g, 0);
                oracle.frontier.push_back(g);
            }
        }
        oracle
    }

    fn lookup(&self, id: StateId) -> Option<u32> {
        self.table.get(id.index()).copied().flatten()
    }

    fn record(&mut self, id: StateId, distance: u32) {
        if self.table.len() <= id.index() {
            self.table.resize(id.index() + 1, None);
        }
        self.table[id.index()] = Some(distance);
    }

    fn get(&mut self, space: &mut StateSpace, from: StateId) -> u32 {
        let stage = space.goal_stage(from);
        let target = if stage > self.last_stage {
            space.with_stage(from, self.last_stage)
        } else {
            from
        };

        if let Some(d) = self.lookup(target) {
            return d;
        }

        while let Some(n) = self.frontier.pop_front() {
            let d_n = self.lookup(n).unwrap_or(0);
            for &m in space.in_neighbors(n) {
                if self.lookup(m).is_some_and(|d_m| d_m <= d_n + 1) {
                    continue;
                }
                self.record(m, d_n + 1);
                self.frontier.push_back(m);
            }
            if let Some(d) = self.lookup(target) {
                return d;
            }
        }

        self.record(target, UNREACHABLE);
        UNREACHABLE
    }
}

/// Distance tables for every agent of one instance.
///
/// Owned by a single planner for the duration of one solve; distances of
/// different agents are never shared.
#[derive(Debug, Clone)]
pub struct DistanceOracle {
    agents: Vec<AgentDistance>,
}

impl DistanceOracle {
    /// Seed one reverse search per agent of `instance`.
    pub fn new(instance: &Instance) -> Self {
        Self {
            agents: instance
                .goal_sequences
                .iter()
                .map(|goals| AgentDistance::new(goals))
                .collect(),
        }
    }

    /// Number of steps from `state` to the agent's current goal.
    ///
    /// The current goal is the one at `min(goal_stage, last stage)`. Returns
    /// [`UNREACHABLE`] if the goal cannot be reached from `state`.
    pub fn get(&mut self, space: &mut StateSpace, agent: usize, state: StateId) -> u32 {
        self.agents[agent].get(space, state)
    }

    /// Number of agents served.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Pending frontier size of one agent's search (0 once fully explored).
    pub fn frontier_len(&self, agent: usize) -> usize {
        self.agents[agent].frontier.len()
    }
}
