// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Lazy constraint-addition search.
//!
//! The high-level search is a depth-first search over distinct joint
//! configurations. Each [`SearchNode`] owns a queue of low-level
//! [constraints](constraint) that are tried one at a time; a constraint fixes
//! the moves of a prefix of agents and the [conflict resolver](pibt) fills in
//! the rest. Constraints are generated lazily: dequeuing a constraint of
//! depth `d` enqueues its children for the `(d+1)`-th agent only then.
//!
//! # Loop
//!
//! 1. Look at the top node S of the stack (do not pop it).
//! 2. If S reaches the goal threshold, follow the parent links back to the
//!    root and return the path.
//! 3. If S has no pending constraint, pop it.
//! 4. Dequeue the next constraint M of S and enqueue its children.
//! 5. Ask the resolver for a successor of S under M; on failure go to 1.
//! 6. If the successor was seen before, push its existing node (merge);
//!    otherwise create, register and push a new node.
//!
//! The search ends with an empty stack (no solution exists) or when the
//! deadline, polled once per iteration, has passed.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lacam::{solve, Graph, Instance, PlannerConfig, StateSpace};
//!
//! let graph = Graph::from_map_str("height 2\nwidth 2\nmap\n..\n..\n").unwrap();
//! let mut space = StateSpace::new(Arc::new(graph));
//! let instance = Instance::from_cells(&mut space, &[0, 3], &[3, 0]).unwrap();
//!
//! let solution = solve(&mut space, &instance, &PlannerConfig::default(), None, None);
//! assert!(instance.is_goal_config(&space, solution.last().unwrap()));
//! ```

pub mod constraint;
pub mod node;
pub mod pibt;

pub use constraint::{Constraint, ConstraintId, ConstraintTree};
pub use node::{NodeId, SearchNode};

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::{debug, info};

use crate::config::PlannerConfig;
use crate::deadline::{self, Deadline};
use crate::instance::Instance;
use crate::memo::{Configuration, DistanceOracle, StateSpace};
use crate::state::{Agent, Counters, OccupancyTable, Statistics};

/// Agents are numbered `0..N` in instance order.
pub type AgentId = usize;

/// Configurations from the start to a goal configuration; empty if none was found.
pub type Solution = Vec<Configuration>;

/// Iterations between progress lines at verbosity 2.
const PROGRESS_INTERVAL: u64 = 10_000;

/// One solve: the search together with its scratch state.
///
/// Everything here, including the search nodes and constraints, is released
/// when the planner is dropped. Only the interned states outlive it, in the
/// borrowed [`StateSpace`].
pub struct Planner<'a, 'r> {
    instance: &'a Instance,
    space: &'a mut StateSpace,
    deadline: Option<&'a Deadline>,
    rng: Option<&'a mut (dyn RngCore + 'r)>,
    config: PlannerConfig,

    /// Goal-stage advances that end the search.
    threshold: usize,

    distances: DistanceOracle,

    /// Random per-state offsets used to break distance ties, indexed by state.
    tie_breakers: Vec<f64>,

    agents: Vec<Agent>,
    occupied_now: OccupancyTable,
    occupied_next: OccupancyTable,

    statistics: Statistics,
}

impl<'a, 'r> Planner<'a, 'r> {
    /// Prepare a solve of a validated `instance`.
    pub fn new(
        space: &'a mut StateSpace,
        instance: &'a Instance,
        config: PlannerConfig,
        deadline: Option<&'a Deadline>,
        rng: Option<&'a mut (dyn RngCore + 'r)>,
    ) -> Self {
        let size = space.graph().size();
        let agents = (0..instance.n)
            .map(|i| Agent::new(i, instance.starts[i]))
            .collect();
        Self {
            instance,
            space,
            deadline,
            rng,
            config,
            threshold: config.threshold.unwrap_or_else(|| instance.total_goals()),
            distances: DistanceOracle::new(instance),
            tie_breakers: Vec::new(),
            agents,
            occupied_now: OccupancyTable::new(size),
            occupied_next: OccupancyTable::new(size),
            statistics: Statistics::new(),
        }
    }

    /// Counters of the most recent [`Self::solve`].
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Run the search.
    pub fn solve(&mut self) -> Solution {
        if self.config.verbose >= 1 {
            info!(
                elapsed_ms = deadline::elapsed_ms(self.deadline),
                agents = self.instance.n,
                threshold = self.threshold,
                "start search"
            );
        }
        self.statistics = Statistics::new();

        let n = self.instance.n;
        let mut constraints = ConstraintTree::new();
        let mut nodes: Vec<SearchNode> = Vec::new();
        let mut open: Vec<NodeId> = Vec::new();
        let mut closed: HashMap<Configuration, NodeId> = HashMap::new();

        let root = SearchNode::root(
            self.instance.starts.clone(),
            self.space,
            &mut self.distances,
            &mut constraints,
        );
        closed.insert(root.config.clone(), NodeId(0));
        nodes.push(root);
        open.push(NodeId(0));
        self.statistics.increment(Counters::NodesCreated);

        let mut solution = Solution::new();
        let mut timed_out = false;

        while let Some(&s) = open.last() {
            if deadline::is_expired(self.deadline) {
                timed_out = true;
                break;
            }
            self.statistics.increment(Counters::Iterations);
            let iterations = self.statistics.get(Counters::Iterations);
            if self.config.verbose >= 2 && iterations % PROGRESS_INTERVAL == 0 {
                info!(
                    elapsed_ms = deadline::elapsed_ms(self.deadline),
                    iterations,
                    explored = closed.len(),
                    "searching"
                );
            }

            let current = &nodes[s.index()];
            if current
                .config
                .enough_goals_reached(self.space, self.threshold)
            {
                solution = backtrack(&nodes, s);
                break;
            }

            let Some(m) = nodes[s.index()].pending.pop_front() else {
                open.pop();
                self.statistics.increment(Counters::NodesExhausted);
                continue;
            };

            let depth = constraints.depth(m);
            if depth < n {
                let node = &mut nodes[s.index()];
                let i = node.order[depth];
                let now = node.config[i];
                let mut children = self.space.neighbors(now).to_vec();
                children.push(now);
                if let Some(rng) = self.rng.as_mut() {
                    children.shuffle(&mut **rng);
                }
                self.statistics
                    .add(Counters::ConstraintsGenerated, children.len() as u64);
                for u in children {
                    node.pending.push_back(constraints.child(m, i, u));
                }
            }

            if !self.get_new_config(&nodes[s.index()], &constraints, m) {
                self.statistics.increment(Counters::ResolverFailures);
                continue;
            }
            let Some(next) = self.next_states() else {
                self.statistics.increment(Counters::ResolverFailures);
                continue;
            };
            let next = self.instance.update_goal_indices(
                self.space,
                &Configuration::new(next),
                &nodes[s.index()].config,
            );

            if let Some(&existing) = closed.get(&next) {
                open.push(existing);
                self.statistics.increment(Counters::DuplicateMerges);
                continue;
            }

            let id = NodeId(nodes.len());
            let child = SearchNode::child(
                next.clone(),
                s,
                &nodes[s.index()],
                self.space,
                &mut self.distances,
                &mut constraints,
            );
            nodes.push(child);
            open.push(id);
            closed.insert(next, id);
            self.statistics.increment(Counters::NodesCreated);
        }

        let outcome = if !solution.is_empty() {
            "solution found"
        } else if timed_out {
            "failed"
        } else {
            "no solution"
        };
        if self.config.verbose >= 1 {
            info!(
                elapsed_ms = deadline::elapsed_ms(self.deadline),
                loop_itr = self.statistics.get(Counters::Iterations),
                explored = closed.len(),
                "{}",
                outcome
            );
        }
        debug!("{}", self.statistics);
        solution
    }
}

/// Configurations from the root to `last`.
fn backtrack(nodes: &[SearchNode], last: NodeId) -> Solution {
    let mut path = Vec::new();
    let mut cursor = Some(last);
    while let Some(id) = cursor {
        let node = &nodes[id.index()];
        path.push(node.config.clone());
        cursor = node.parent;
    }
    path.reverse();
    path
}

/// Plan for `instance`, which must be valid.
///
/// Returns the configurations from the start to the first configuration
/// whose cumulative goal-stage advances reach the threshold (all goals by
/// default). The result is empty if no such configuration is reachable or
/// the deadline passed first, and has a single element if the start already
/// qualifies. Without a random source the search is deterministic.
pub fn solve(
    space: &mut StateSpace,
    instance: &Instance,
    config: &PlannerConfig,
    deadline: Option<&Deadline>,
    rng: Option<&mut dyn RngCore>,
) -> Solution {
    if config.verbose >= 1 {
        info!(
            elapsed_ms = deadline::elapsed_ms(deadline),
            "pre-processing"
        );
    }
    Planner::new(space, instance, *config, deadline, rng).solve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use std::sync::Arc;

    fn space(map: &str) -> StateSpace {
        StateSpace::new(Arc::new(Graph::from_map_str(map).unwrap()))
    }

    #[test]
    fn test_already_at_goal() {
        let mut space = space("height 1\nwidth 3\nmap\n...\n");
        let ins = Instance::from_cells(&mut space, &[0, 2], &[0, 2]).unwrap();
        let solution = solve(&mut space, &ins, &PlannerConfig::default(), None, None);
        assert_eq!(solution.len(), 1);
        assert_eq!(solution[0], ins.starts);
    }

    #[test]
    fn test_single_agent_corridor() {
        let mut space = space("height 1\nwidth 4\nmap\n....\n");
        let ins = Instance::from_cells(&mut space, &[0], &[3]).unwrap();
        let mut planner = Planner::new(&mut space, &ins, PlannerConfig::default(), None, None);
        let solution = planner.solve();
        assert_eq!(solution.len(), 4);
        assert_eq!(planner.statistics().get(Counters::NodesCreated), 4);
        assert_eq!(planner.statistics().get(Counters::DuplicateMerges), 0);

        let path: Vec<usize> = solution.iter().map(|c| space.vertex(c[0])).collect();
        assert_eq!(path, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_unsolvable_swap_exhausts() {
        let mut space = space("height 1\nwidth 2\nmap\n..\n");
        let ins = Instance::from_cells(&mut space, &[0, 1], &[1, 0]).unwrap();
        let mut planner = Planner::new(&mut space, &ins, PlannerConfig::default(), None, None);
        assert!(planner.solve().is_empty());
        assert!(planner.statistics().get(Counters::NodesExhausted) >= 1);
    }

    #[test]
    fn test_expired_deadline() {
        let mut space = space("height 1\nwidth 4\nmap\n....\n");
        let ins = Instance::from_cells(&mut space, &[0], &[3]).unwrap();
        let deadline = Deadline::from_duration(std::time::Duration::ZERO);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let solution = solve(
            &mut space,
            &ins,
            &PlannerConfig::default(),
            Some(&deadline),
            None,
        );
        assert!(solution.is_empty());
    }
}
