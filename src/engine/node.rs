// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! High-level search nodes.

use std::collections::VecDeque;

use super::constraint::{ConstraintId, ConstraintTree};
use super::AgentId;
use crate::memo::{Configuration, DistanceOracle, StateSpace};

/// Index of a node in the planner's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A distinct joint configuration reached by the high-level search.
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub config: Configuration,
    pub parent: Option<NodeId>,

    /// Per-agent urgency; higher goes first.
    pub priorities: Vec<f64>,

    /// Agents by decreasing priority, ties in agent order.
    pub order: Vec<AgentId>,

    /// Constraints still to be tried, in breadth order of the constraint tree.
    pub pending: VecDeque<ConstraintId>,
}

impl SearchNode {
    /// The initial node: priority is distance to goal divided by the agent count.
    pub fn root(
        config: Configuration,
        space: &mut StateSpace,
        distances: &mut DistanceOracle,
        constraints: &mut ConstraintTree,
    ) -> Self {
        let n = config.len();
        let priorities = (0..n)
            .map(|i| distances.get(space, i, config[i]) as f64 / n as f64)
            .collect();
        Self::new(config, None, priorities, constraints)
    }

    /// A successor of `parent`.
    ///
    /// Agents still away from their current goal gain one unit of priority;
    /// an agent that has arrived keeps only the fractional part, so it yields
    /// to every agent still travelling.
    pub fn child(
        config: Configuration,
        parent_id: NodeId,
        parent: &SearchNode,
        space: &mut StateSpace,
        distances: &mut DistanceOracle,
        constraints: &mut ConstraintTree,
    ) -> Self {
        let priorities = (0..config.len())
            .map(|i| {
                let p = parent.priorities[i];
                if distances.get(space, i, config[i]) != 0 {
                    p + 1.0
                } else {
                    p.fract()
                }
            })
            .collect();
        Self::new(config, Some(parent_id), priorities, constraints)
    }

    fn new(
        config: Configuration,
        parent: Option<NodeId>,
        priorities: Vec<f64>,
        constraints: &mut ConstraintTree,
    ) -> Self {
        let mut order: Vec<AgentId> = (0..config.len()).collect();
        order.sort_by(|&i, &j| priorities[j].total_cmp(&priorities[i]));

        let mut pending = VecDeque::new();
        pending.push_back(constraints.root());
        Self {
            config,
            parent,
            priorities,
            order,
            pending,
        }
    }
}
