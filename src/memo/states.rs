// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Canonical states (poses with a goal stage).
//!
//! Every `(vertex, orientation, goal_stage)` triple is interned once into an
//! arena and afterwards referred to by its [`StateId`]. Equality and hashing
//! of states, configurations and search keys are therefore plain integer
//! operations.
//!
//! Neighbor lists are computed on first request and cached on the state.
//! Forward and reverse lists differ once orientation is modeled: a translation
//! only follows the facing, so the state that can *reach* `s` by moving is
//! the one behind it, not the one in front.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::graph::{Graph, Orientation, VertexId};

/// Identity of an interned state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    /// Position in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Location and facing, without goal bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pose {
    pub vertex: VertexId,
    pub orientation: Orientation,
}

impl Pose {
    pub fn new(vertex: VertexId, orientation: Orientation) -> Self {
        Self {
            vertex,
            orientation,
        }
    }

    /// A pose at `vertex` with orientation not modeled.
    pub fn at(vertex: VertexId) -> Self {
        Self::new(vertex, Orientation::None)
    }
}

/// An interned state.
#[derive(Debug, Clone)]
struct StateData {
    pose: Pose,
    goal_stage: usize,
    neighbors: Option<Vec<StateId>>,
    in_neighbors: Option<Vec<StateId>>,
}

/// Arena of canonical states over one graph.
///
/// The space only grows; an id handed out stays valid (and keeps meaning the
/// same triple) for the lifetime of the space. Instances and planners built
/// over the same graph share one space.
#[derive(Debug, Clone)]
pub struct StateSpace {
    graph: Arc<Graph>,
    states: Vec<StateData>,
    lookup: HashMap<(Pose, usize), StateId>,
}

impl StateSpace {
    /// Create an empty space over `graph`.
    pub fn new(graph: Arc<Graph>) -> Self {
        Self {
            graph,
            states: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    /// Number of states interned so far.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Whether `id` was issued by this space.
    pub fn contains(&self, id: StateId) -> bool {
        id.index() < self.states.len()
    }

    /// Canonical id of `(pose, goal_stage)`, interning it on first request.
    pub fn intern(&mut self, pose: Pose, goal_stage: usize) -> StateId {
        if let Some(&id) = self.lookup.get(&(pose, goal_stage)) {
            return id;
        }
        let id = StateId(self.states.len() as u32);
        self.states.push(StateData {
            pose,
            goal_stage,
            neighbors: None,
            in_neighbors: None,
        });
        self.lookup.insert((pose, goal_stage), id);
        id
    }

    /// Canonical id of an unoriented state at `vertex`.
    pub fn at(&mut self, vertex: VertexId, goal_stage: usize) -> StateId {
        self.intern(Pose::at(vertex), goal_stage)
    }

    /// The same pose, moved to another goal stage.
    pub fn with_stage(&mut self, id: StateId, goal_stage: usize) -> StateId {
        let pose = self.pose(id);
        self.intern(pose, goal_stage)
    }

    pub fn pose(&self, id: StateId) -> Pose {
        self.states[id.index()].pose
    }

    pub fn vertex(&self, id: StateId) -> VertexId {
        self.states[id.index()].pose.vertex
    }

    pub fn orientation(&self, id: StateId) -> Orientation {
        self.states[id.index()].pose.orientation
    }

    pub fn goal_stage(&self, id: StateId) -> usize {
        self.states[id.index()].goal_stage
    }

    /// States reachable from `id` in one step, excluding staying put.
    ///
    /// Unoriented: every adjacent vertex. Oriented: the two quarter turns in
    /// place, then the translation along the current facing if that cell is
    /// free. The goal stage is carried over unchanged.
    pub fn neighbors(&mut self, id: StateId) -> &[StateId] {
        if self.states[id.index()].neighbors.is_none() {
            self.expand(id);
        }
        self.states[id.index()].neighbors.as_deref().unwrap_or(&[])
    }

    /// States that reach `id` in one step; the reverse of [`Self::neighbors`].
    pub fn in_neighbors(&mut self, id: StateId) -> &[StateId] {
        if self.states[id.index()].in_neighbors.is_none() {
            self.expand(id);
        }
        self.states[id.index()].in_neighbors.as_deref().unwrap_or(&[])
    }

    fn expand(&mut self, id: StateId) {
        let Pose {
            vertex,
            orientation,
        } = self.pose(id);
        let stage = self.goal_stage(id);
        let graph = Arc::clone(&self.graph);

        let mut neighbors = Vec::with_capacity(4);
        let mut in_neighbors = Vec::with_capacity(4);
        match orientation.step() {
            None => {
                for &u in &graph.vertex(vertex).neighbors {
                    let s = self.at(u, stage);
                    neighbors.push(s);
                    in_neighbors.push(s);
                }
            }
            Some((dx, dy)) => {
                for &turned in orientation.adjacent() {
                    let s = self.intern(Pose::new(vertex, turned), stage);
                    neighbors.push(s);
                    in_neighbors.push(s);
                }
                if let Some(ahead) = graph.step(vertex, (dx, dy)) {
                    neighbors.push(self.intern(Pose::new(ahead, orientation), stage));
                }
                if let Some(behind) = graph.step(vertex, (-dx, -dy)) {
                    in_neighbors.push(self.intern(Pose::new(behind, orientation), stage));
                }
            }
        }

        let data = &mut self.states[id.index()];
        data.neighbors = Some(neighbors);
        data.in_neighbors = Some(in_neighbors);
    }

    /// Human-readable form, `State((x, y) FACING stage)`.
    pub fn describe(&self, id: StateId) -> String {
        let data = &self.states[id.index()];
        format!(
            "State({} {} {})",
            self.graph.vertex(data.pose.vertex),
            data.pose.orientation,
            data.goal_stage
        )
    }
}
