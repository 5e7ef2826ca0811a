// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Joint configurations: one canonical state per agent.

use std::ops::Index;

use super::states::{StateId, StateSpace};

/// The states of all agents at one time step, indexed by agent id.
///
/// Because goal stages are part of each state, two configurations compare
/// equal exactly when every agent has the same pose *and* the same goal
/// progress, which is the key used for duplicate detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Configuration(Vec<StateId>);

impl Configuration {
    pub fn new(states: Vec<StateId>) -> Self {
        Self(states)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[StateId] {
        &self.0
    }

    /// Total goal-stage advances over all agents.
    pub fn goals_reached(&self, space: &StateSpace) -> usize {
        self.0.iter().map(|&s| space.goal_stage(s)).sum()
    }

    /// Whether at least `threshold` goal-stage advances have been made.
    pub fn enough_goals_reached(&self, space: &StateSpace, threshold: usize) -> bool {
        let mut count = 0;
        for &s in &self.0 {
            count += space.goal_stage(s);
            if count >= threshold {
                return true;
            }
        }
        count >= threshold
    }

    /// Goal stage of every agent.
    pub fn goal_indices(&self, space: &StateSpace) -> Vec<usize> {
        self.0.iter().map(|&s| space.goal_stage(s)).collect()
    }

    pub fn describe(&self, space: &StateSpace) -> String {
        let states: Vec<String> = self.0.iter().map(|&s| space.describe(s)).collect();
        format!("{{ {} }}", states.join(" "))
    }
}

impl Index<usize> for Configuration {
    type Output = StateId;

    fn index(&self, agent: usize) -> &StateId {
        &self.0[agent]
    }
}

impl From<Vec<StateId>> for Configuration {
    fn from(states: Vec<StateId>) -> Self {
        Self(states)
    }
}

impl FromIterator<StateId> for Configuration {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn space() -> StateSpace {
        let graph = Graph::from_map_str("height 1\nwidth 4\nmap\n....\n").unwrap();
        StateSpace::new(Arc::new(graph))
    }

    #[test]
    fn test_equality_includes_goal_stage() {
        let mut space = space();
        let a = Configuration::new(vec![space.at(0, 0), space.at(1, 0)]);
        let b = Configuration::new(vec![space.at(0, 0), space.at(1, 0)]);
        let c = Configuration::new(vec![space.at(0, 1), space.at(1, 0)]);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Configuration> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_goal_counting() {
        let mut space = space();
        let c = Configuration::new(vec![space.at(0, 2), space.at(1, 1), space.at(2, 0)]);
        assert_eq!(c.goals_reached(&space), 3);
        assert_eq!(c.goal_indices(&space), vec![2, 1, 0]);
        assert!(c.enough_goals_reached(&space, 0));
        assert!(c.enough_goals_reached(&space, 3));
        assert!(!c.enough_goals_reached(&space, 4));
    }
}
