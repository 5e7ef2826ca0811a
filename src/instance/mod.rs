// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Problem instances: a graph, start poses and per-agent goal sequences.
//!
//! Goal `k` of an agent is stored as the canonical state at goal stage `k`.
//! An agent's stage advances by one whenever its pose matches the goal of its
//! current stage; see [`Instance::update_goal_indices`].

pub mod scenario;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::error::{InstanceError, LoadError};
use crate::graph::Graph;
use crate::memo::{Configuration, Pose, StateId, StateSpace};

/// A multi-agent path finding problem with goal sequences.
#[derive(Debug, Clone)]
pub struct Instance {
    pub graph: Arc<Graph>,

    /// Initial configuration, goal stages already advanced for agents
    /// starting on their first goal.
    pub starts: Configuration,

    /// Agent id to ordered goal states; entry `k` has goal stage `k`.
    pub goal_sequences: Vec<Vec<StateId>>,

    /// Number of agents.
    pub n: usize,
}

impl Instance {
    /// Build an instance from poses.
    ///
    /// The states are interned in `space`, which must be used for every later
    /// operation on this instance.
    pub fn new(space: &mut StateSpace, starts: &[Pose], goal_sequences: &[Vec<Pose>]) -> Self {
        let raw_starts: Configuration = starts.iter().map(|&p| space.intern(p, 0)).collect();
        let goal_sequences: Vec<Vec<StateId>> = goal_sequences
            .iter()
            .map(|goals| {
                goals
                    .iter()
                    .enumerate()
                    .map(|(stage, &p)| space.intern(p, stage))
                    .collect()
            })
            .collect();

        let mut instance = Self {
            graph: Arc::clone(space.graph()),
            starts: raw_starts.clone(),
            goal_sequences,
            n: starts.len(),
        };
        instance.starts = instance.update_goal_indices(space, &raw_starts, &raw_starts);
        instance
    }

    /// Unoriented instance with one goal per agent, given as cell indices.
    pub fn from_cells(
        space: &mut StateSpace,
        starts: &[usize],
        goals: &[usize],
    ) -> Result<Self, LoadError> {
        let sequences: Vec<Vec<usize>> = goals.iter().map(|&g| vec![g]).collect();
        Self::from_cell_sequences(space, starts, &sequences)
    }

    /// Unoriented instance with goal sequences, given as cell indices.
    pub fn from_cell_sequences(
        space: &mut StateSpace,
        starts: &[usize],
        goal_sequences: &[Vec<usize>],
    ) -> Result<Self, LoadError> {
        let graph = Arc::clone(space.graph());
        let pose = |index: usize| -> Result<Pose, LoadError> {
            graph
                .cell(index)
                .map(Pose::at)
                .ok_or(LoadError::InvalidCell { index })
        };

        let starts = starts
            .iter()
            .map(|&k| pose(k))
            .collect::<Result<Vec<_>, _>>()?;
        let goal_sequences = goal_sequences
            .iter()
            .map(|goals| goals.iter().map(|&k| pose(k)).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(space, &starts, &goal_sequences))
    }

    /// Check that the instance is well formed.
    ///
    /// The planner assumes a validated instance.
    pub fn validate(&self, space: &StateSpace) -> Result<(), InstanceError> {
        if self.starts.len() != self.n || self.goal_sequences.len() != self.n {
            return Err(InstanceError::AgentCountMismatch {
                agents: self.n,
                starts: self.starts.len(),
                goals: self.goal_sequences.len(),
            });
        }

        let mut occupied = HashMap::with_capacity(self.n);
        for agent in 0..self.n {
            let start = self.starts[agent];
            let goals = &self.goal_sequences[agent];
            if !space.contains(start) || !goals.iter().all(|&g| space.contains(g)) {
                return Err(InstanceError::UnknownState { agent });
            }
            if goals.is_empty() {
                return Err(InstanceError::EmptyGoalSequence { agent });
            }

            let oriented = space.orientation(start).is_oriented();
            if goals
                .iter()
                .any(|&g| space.orientation(g).is_oriented() != oriented)
            {
                return Err(InstanceError::MixedOrientation { agent });
            }

            let vertex = space.vertex(start);
            if let Some(first) = occupied.insert(vertex, agent) {
                return Err(InstanceError::SharedStart {
                    first,
                    second: agent,
                    vertex,
                });
            }
        }
        Ok(())
    }

    /// Simple feasibility check, logging the reason on failure.
    pub fn is_valid(&self, space: &StateSpace) -> bool {
        match self.validate(space) {
            Ok(()) => true,
            Err(err) => {
                warn!("invalid instance: {}", err);
                false
            }
        }
    }

    /// Sum of all goal sequence lengths.
    pub fn total_goals(&self) -> usize {
        self.goal_sequences.iter().map(Vec::len).sum()
    }

    /// Whether every agent has completed its whole goal sequence.
    pub fn is_goal_config(&self, space: &StateSpace, config: &Configuration) -> bool {
        config.enough_goals_reached(space, self.total_goals())
    }

    /// Goal stage an agent has after arriving at `pose` with `stage` before the move.
    pub fn next_goal_stage(&self, space: &StateSpace, agent: usize, pose: Pose, stage: usize) -> usize {
        match self.goal_sequences[agent].get(stage) {
            Some(&goal) if space.pose(goal) == pose => stage + 1,
            _ => stage,
        }
    }

    /// Re-stamp the goal stages of `config`, the successor of `prev`.
    ///
    /// Each agent keeps the stage it had in `prev`, advanced by one if its new
    /// pose is the goal of that stage.
    pub fn update_goal_indices(
        &self,
        space: &mut StateSpace,
        config: &Configuration,
        prev: &Configuration,
    ) -> Configuration {
        (0..self.n)
            .map(|agent| {
                let pose = space.pose(config[agent]);
                let stage = self.next_goal_stage(space, agent, pose, space.goal_stage(prev[agent]));
                space.intern(pose, stage)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Orientation;

    fn space(map: &str) -> StateSpace {
        StateSpace::new(Arc::new(Graph::from_map_str(map).unwrap()))
    }

    const MAP_8X8: &str = "height 8\nwidth 8\nmap\n........\n........\n........\n........\n........\n........\n........\n........\n";

    #[test]
    fn test_sequence_instance() {
        let mut space = space(MAP_8X8);
        let ins =
            Instance::from_cell_sequences(&mut space, &[0, 1], &[vec![2, 3, 4], vec![5, 6, 7]])
                .unwrap();

        assert_eq!(ins.n, 2);
        assert_eq!(ins.starts.len(), 2);
        assert_eq!(ins.total_goals(), 6);
        assert!(ins.is_valid(&space));

        let first = ins.goal_sequences[0][0];
        let last = ins.goal_sequences[1][2];
        assert_eq!(ins.graph.vertex(space.vertex(first)).index, 2);
        assert_eq!(space.goal_stage(first), 0);
        assert_eq!(ins.graph.vertex(space.vertex(last)).index, 7);
        assert_eq!(space.goal_stage(last), 2);
        assert_eq!(ins.starts.goal_indices(&space), vec![0, 0]);
    }

    #[test]
    fn test_start_on_first_goal_advances() {
        let mut space = space(MAP_8X8);
        let ins = Instance::from_cell_sequences(&mut space, &[0, 1], &[vec![0, 3], vec![5]])
            .unwrap();
        assert_eq!(ins.starts.goal_indices(&space), vec![1, 0]);
    }

    #[test]
    fn test_update_goal_indices() {
        let mut space = space(MAP_8X8);
        let ins = Instance::from_cell_sequences(&mut space, &[0], &[vec![1, 2]]).unwrap();

        let prev = ins.starts.clone();
        let moved = Configuration::new(vec![space.at(1, 0)]);
        let next = ins.update_goal_indices(&mut space, &moved, &prev);
        assert_eq!(next.goal_indices(&space), vec![1]);

        // arriving at goal 1 while still at stage 0 does not count
        let skipped = Configuration::new(vec![space.at(2, 0)]);
        let next = ins.update_goal_indices(&mut space, &skipped, &prev);
        assert_eq!(next.goal_indices(&space), vec![0]);

        let at_stage_one = Configuration::new(vec![space.at(1, 1)]);
        let arrived = Configuration::new(vec![space.at(2, 1)]);
        let done = ins.update_goal_indices(&mut space, &arrived, &at_stage_one);
        assert_eq!(done.goal_indices(&space), vec![2]);
        assert!(ins.is_goal_config(&space, &done));

        // no further advance past the end
        let again = ins.update_goal_indices(&mut space, &done, &done);
        assert_eq!(again, done);
    }

    #[test]
    fn test_invalid_cells() {
        let mut space = space("height 1\nwidth 3\nmap\n.@.\n");
        let err = Instance::from_cells(&mut space, &[1], &[2]).unwrap_err();
        assert!(matches!(err, LoadError::InvalidCell { index: 1 }));
        let err = Instance::from_cells(&mut space, &[0], &[7]).unwrap_err();
        assert!(matches!(err, LoadError::InvalidCell { index: 7 }));
    }

    #[test]
    fn test_validation_errors() {
        let mut space = space(MAP_8X8);

        let mut ins = Instance::from_cells(&mut space, &[0, 1], &[2, 3]).unwrap();
        ins.n = 3;
        assert!(matches!(
            ins.validate(&space),
            Err(InstanceError::AgentCountMismatch { agents: 3, .. })
        ));
        assert!(!ins.is_valid(&space));

        let ins = Instance::from_cells(&mut space, &[0, 0], &[2, 3]).unwrap();
        assert_eq!(
            ins.validate(&space),
            Err(InstanceError::SharedStart {
                first: 0,
                second: 1,
                vertex: 0
            })
        );

        let ins = Instance::from_cell_sequences(&mut space, &[0], &[vec![]]).unwrap();
        assert_eq!(
            ins.validate(&space),
            Err(InstanceError::EmptyGoalSequence { agent: 0 })
        );

        let ins = Instance::new(
            &mut space,
            &[Pose::new(0, Orientation::XPlus)],
            &[vec![Pose::at(5)]],
        );
        assert_eq!(
            ins.validate(&space),
            Err(InstanceError::MixedOrientation { agent: 0 })
        );
    }
}
