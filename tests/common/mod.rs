// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use lacam::{Graph, Instance, Pose, Solution, StateSpace, VertexId};
use rand::seq::SliceRandom;
use rand::Rng;

pub const MAP_2X1: &str = "type octile\nheight 1\nwidth 2\nmap\n..\n";

/// Four vertices on a cycle: 0 (0,0), 1 (1,0), 2 (0,1), 3 (1,1).
pub const MAP_2X2: &str = "type octile\nheight 2\nwidth 2\nmap\n..\n..\n";

pub const MAP_3X3: &str = "type octile\nheight 3\nwidth 3\nmap\n...\n...\n...\n";

pub const MAP_4X4: &str = "type octile\nheight 4\nwidth 4\nmap\n....\n....\n....\n....\n";

/// Path of a file under `tests/assets`.
pub fn asset(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("assets")
        .join(name)
}

pub fn space(map: &str) -> StateSpace {
    StateSpace::new(Arc::new(Graph::from_map_str(map).unwrap()))
}

pub fn space_from_asset(name: &str) -> StateSpace {
    StateSpace::new(Arc::new(Graph::load(asset(name)).unwrap()))
}

/// Vertices visited by one agent, one per step.
pub fn vertex_path(space: &StateSpace, solution: &Solution, agent: usize) -> Vec<VertexId> {
    solution.iter().map(|c| space.vertex(c[agent])).collect()
}

/// Whether `targets` appear in `path` in order (not necessarily adjacent).
pub fn visits_in_order(path: &[VertexId], targets: &[VertexId]) -> bool {
    let mut rest = path.iter();
    targets.iter().all(|t| rest.any(|v| v == t))
}

/// Distinct random starts; `k` goals per agent, each layer a permutation of the vertices.
pub fn random_sequences<R: Rng>(space: &mut StateSpace, rng: &mut R, n: usize, k: usize) -> Instance {
    let size = space.graph().size();
    let mut order: Vec<VertexId> = (0..size).collect();

    order.shuffle(rng);
    let starts: Vec<Pose> = order[..n].iter().map(|&v| Pose::at(v)).collect();

    let mut goals = vec![Vec::with_capacity(k); n];
    for _ in 0..k {
        order.shuffle(rng);
        for (agent, &v) in order[..n].iter().enumerate() {
            goals[agent].push(Pose::at(v));
        }
    }
    Instance::new(space, &starts, &goals)
}
