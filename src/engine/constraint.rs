// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Low-level constraints: partial move assignments.
//!
//! A constraint of depth `d` fixes the next state of the first `d` agents in
//! a node's priority order. Each constraint stores only its own assignment
//! and a link to its parent, so siblings share their common prefix. All
//! constraints of one solve live in a single [`ConstraintTree`] arena that
//! is dropped when the solve returns.

use super::AgentId;
use crate::memo::StateId;

/// Index of a constraint in its [`ConstraintTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintId(usize);

#[derive(Debug, Clone)]
pub struct Constraint {
    pub parent: Option<ConstraintId>,

    /// The move added by this constraint; `None` only for the empty root.
    pub assignment: Option<(AgentId, StateId)>,

    /// Number of assignments along the path to the root.
    pub depth: usize,
}

/// Arena holding every constraint of one solve.
#[derive(Debug, Clone, Default)]
pub struct ConstraintTree {
    constraints: Vec<Constraint>,
}

impl ConstraintTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh empty (depth 0) constraint.
    pub fn root(&mut self) -> ConstraintId {
        self.push(Constraint {
            parent: None,
            assignment: None,
            depth: 0,
        })
    }

    /// Extend `parent` by moving `agent` to `state`.
    pub fn child(&mut self, parent: ConstraintId, agent: AgentId, state: StateId) -> ConstraintId {
        let depth = self.get(parent).depth + 1;
        self.push(Constraint {
            parent: Some(parent),
            assignment: Some((agent, state)),
            depth,
        })
    }

    fn push(&mut self, constraint: Constraint) -> ConstraintId {
        let id = ConstraintId(self.constraints.len());
        self.constraints.push(constraint);
        id
    }

    pub fn get(&self, id: ConstraintId) -> &Constraint {
        &self.constraints[id.0]
    }

    pub fn depth(&self, id: ConstraintId) -> usize {
        self.get(id).depth
    }

    /// The assignments of `id`, outermost first.
    pub fn assignments(&self, id: ConstraintId) -> Vec<(AgentId, StateId)> {
        let mut result = Vec::with_capacity(self.depth(id));
        let mut cursor = Some(id);
        while let Some(c) = cursor {
            let constraint = self.get(c);
            if let Some(assignment) = constraint.assignment {
                result.push(assignment);
            }
            cursor = constraint.parent;
        }
        result.reverse();
        result
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::memo::StateSpace;
    use std::sync::Arc;

    #[test]
    fn test_prefix_sharing() {
        let graph = Graph::from_map_str("height 1\nwidth 3\nmap\n...\n").unwrap();
        let mut space = StateSpace::new(Arc::new(graph));
        let (a, b, c) = (space.at(0, 0), space.at(1, 0), space.at(2, 0));

        let mut tree = ConstraintTree::new();
        let root = tree.root();
        let first = tree.child(root, 2, a);
        let left = tree.child(first, 0, b);
        let right = tree.child(first, 0, c);

        assert_eq!(tree.depth(root), 0);
        assert_eq!(tree.depth(right), 2);
        assert!(tree.assignments(root).is_empty());
        assert_eq!(tree.assignments(left), vec![(2, a), (0, b)]);
        assert_eq!(tree.assignments(right), vec![(2, a), (0, c)]);
        assert_eq!(tree.len(), 4);
    }
}
