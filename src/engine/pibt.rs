// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Conflict resolution by priority inheritance (PIBT).
//!
//! Given a node and one of its constraints, [`Planner::get_new_config`]
//! fixes the constrained moves and then lets every remaining agent, in
//! priority order, pick its best free next state. An agent that wants a
//! vertex held by an undecided agent lends its priority to that agent, which
//! must then move out of the way first.
//!
//! Two conflict models are supported:
//!
//! - *allow following*: an agent may enter a vertex that is being vacated in
//!   the same step, but two agents may not swap.
//! - *no following*: an agent may never enter a vertex occupied at the start
//!   of the step by another agent.
//!
//! An agent that cannot be placed stays where it is and reports failure to
//! the agent that pushed it, which then tries its next candidate.

use rand::Rng;
use tracing::trace;

use super::constraint::{ConstraintId, ConstraintTree};
use super::node::SearchNode;
use super::{AgentId, Planner};
use crate::memo::StateId;

impl Planner<'_, '_> {
    /// Try to extend `node` by one step, honouring `constraint`.
    ///
    /// On success every agent has a next state and no two share a vertex.
    pub(super) fn get_new_config(
        &mut self,
        node: &SearchNode,
        constraints: &ConstraintTree,
        constraint: ConstraintId,
    ) -> bool {
        self.occupied_now.clear();
        self.occupied_next.clear();
        for agent in self.agents.iter_mut() {
            agent.now = node.config[agent.id];
            agent.next = None;
            self.occupied_now
                .reserve(self.space.vertex(agent.now), agent.id);
        }

        for (i, target) in constraints.assignments(constraint) {
            let l = self.space.vertex(target);
            if !self.occupied_next.is_free(l) {
                return false;
            }

            if self.config.allow_following {
                let l_pre = self.space.vertex(self.agents[i].now);
                if let (Some(entering), Some(leaving)) =
                    (self.occupied_next.get(l_pre), self.occupied_now.get(l))
                {
                    if entering == leaving {
                        return false;
                    }
                }
            } else if self.occupied_now.get(l).is_some_and(|k| k != i) {
                return false;
            }

            self.agents[i].next = Some(target);
            self.occupied_next.reserve(l, i);
        }

        for &k in &node.order {
            if !self.agents[k].is_decided() && !self.pibt(k, None) {
                trace!("agent {} could not be placed", k);
                return false;
            }
        }
        true
    }

    /// The next configuration once [`Self::get_new_config`] succeeded.
    pub(super) fn next_states(&self) -> Option<Vec<StateId>> {
        self.agents.iter().map(|a| a.next).collect()
    }

    fn pibt(&mut self, i: AgentId, caller: Option<AgentId>) -> bool {
        if self.config.allow_following {
            self.pibt_following(i)
        } else {
            self.pibt_no_following(i, caller)
        }
    }

    /// Next-state candidates of agent `i`, best first.
    ///
    /// Sorted by distance to goal plus a tie-breaker in `[0, 1)`, which is
    /// refreshed for the neighbours when a random source is present. Staying
    /// is offered only when `with_stay`.
    fn candidates(&mut self, i: AgentId, with_stay: bool) -> Vec<StateId> {
        let now = self.agents[i].now;
        let mut candidates = self.space.neighbors(now).to_vec();

        if let Some(rng) = self.rng.as_mut() {
            for &u in &candidates {
                if self.tie_breakers.len() <= u.index() {
                    self.tie_breakers.resize(u.index() + 1, 0.0);
                }
                self.tie_breakers[u.index()] = rng.random::<f64>();
            }
        }
        if with_stay {
            candidates.push(now);
        }

        let mut scored = Vec::with_capacity(candidates.len());
        for u in candidates {
            let d = self.distances.get(self.space, i, u) as f64;
            let tie = self.tie_breakers.get(u.index()).copied().unwrap_or(0.0);
            scored.push((d + tie, u));
        }
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.into_iter().map(|(_, u)| u).collect()
    }

    fn pibt_following(&mut self, i: AgentId) -> bool {
        let v_now = self.space.vertex(self.agents[i].now);

        for u in self.candidates(i, true) {
            let vu = self.space.vertex(u);
            if !self.occupied_next.is_free(vu) {
                continue;
            }

            let occupant = self.occupied_now.get(vu);
            if let Some(k) = occupant {
                // k would swap with i
                if self.agents[k]
                    .next
                    .is_some_and(|n| self.space.vertex(n) == v_now)
                {
                    continue;
                }
            }

            self.occupied_next.reserve(vu, i);
            self.agents[i].next = Some(u);

            match occupant {
                None => return true,
                Some(k) if k == i => return true,
                Some(k) => {
                    if !self.agents[k].is_decided() && !self.pibt(k, Some(i)) {
                        continue;
                    }
                    return true;
                }
            }
        }

        self.stay(i);
        false
    }

    fn pibt_no_following(&mut self, i: AgentId, caller: Option<AgentId>) -> bool {
        let now = self.agents[i].now;
        let v_now = self.space.vertex(now);

        for u in self.candidates(i, caller.is_none()) {
            let vu = self.space.vertex(u);
            if !self.occupied_next.is_free(vu) {
                continue;
            }

            match self.occupied_now.get(vu) {
                Some(k) if k != i => {
                    if !self.agents[k].is_decided() {
                        // hold our own vertex so k cannot fall back onto it
                        self.occupied_next.reserve(v_now, i);
                        self.agents[i].next = Some(now);
                        if self.pibt(k, Some(i)) {
                            return true;
                        }
                        self.occupied_next.release(v_now);
                        self.agents[i].next = None;
                    }
                }
                _ => {
                    self.occupied_next.reserve(vu, i);
                    self.agents[i].next = Some(u);
                    return true;
                }
            }
        }

        self.stay(i);
        false
    }

    fn stay(&mut self, i: AgentId) {
        let now = self.agents[i].now;
        self.occupied_next.reserve(self.space.vertex(now), i);
        self.agents[i].next = Some(now);
    }
}
