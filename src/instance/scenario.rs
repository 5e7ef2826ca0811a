// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Loading instances from MovingAI scenario files, and random instances.
//!
//! A scenario line is tab separated:
//!
//! ```text
//! bucket  map-name.map  width  height  start-x  start-y  goal-x  goal-y  optimal-length
//! ```
//!
//! Lines that do not have this shape (the `version` header, blank lines) are
//! skipped, as are agents whose start or goal is off the map or blocked.

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::Instance;
use crate::error::LoadError;
use crate::graph::{Graph, VertexId};
use crate::memo::{Pose, StateSpace};

/// Start and goal coordinates of one scenario line.
fn parse_line(line: &str) -> Option<[usize; 4]> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 9 || !fields[1].ends_with(".map") || fields[8].is_empty() {
        return None;
    }
    for f in [fields[0], fields[2], fields[3]] {
        if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    let mut coords = [0; 4];
    for (slot, field) in coords.iter_mut().zip(&fields[4..8]) {
        *slot = field.parse().ok()?;
    }
    Some(coords)
}

/// Vertex at scenario coordinates, `None` when off the map or blocked.
fn lookup(graph: &Graph, x: usize, y: usize) -> Option<VertexId> {
    graph.at(i32::try_from(x).ok()?, i32::try_from(y).ok()?)
}

impl Instance {
    /// Build an instance from the first `n` usable agents of a scenario.
    pub fn from_scenario_str(
        space: &mut StateSpace,
        text: &str,
        n: usize,
    ) -> Result<Self, LoadError> {
        let graph = std::sync::Arc::clone(space.graph());
        let mut starts = Vec::with_capacity(n);
        let mut goals = Vec::with_capacity(n);

        for line in text.lines() {
            if starts.len() == n {
                break;
            }
            let line = line.trim_end_matches('\r');
            let Some([sx, sy, gx, gy]) = parse_line(line) else {
                continue;
            };
            let (Some(s), Some(g)) = (lookup(&graph, sx, sy), lookup(&graph, gx, gy)) else {
                debug!("skipping scenario agent ({sx}, {sy}) -> ({gx}, {gy})");
                continue;
            };
            starts.push(Pose::at(s));
            goals.push(vec![Pose::at(g)]);
        }

        if starts.len() < n {
            return Err(LoadError::NotEnoughAgents {
                requested: n,
                found: starts.len(),
            });
        }
        Ok(Self::new(space, &starts, &goals))
    }

    /// Load the first `n` usable agents of a scenario file.
    pub fn load_scenario(
        space: &mut StateSpace,
        path: impl AsRef<Path>,
        n: usize,
    ) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_scenario_str(space, &text, n)
    }

    /// Random starts and goals: two independent permutations of the vertices.
    ///
    /// Starts are pairwise distinct, as are goals.
    pub fn random<R: Rng + ?Sized>(
        space: &mut StateSpace,
        rng: &mut R,
        n: usize,
    ) -> Result<Self, LoadError> {
        let size = space.graph().size();
        if n > size {
            return Err(LoadError::TooManyAgents {
                requested: n,
                available: size,
            });
        }

        let mut order: Vec<usize> = (0..size).collect();
        order.shuffle(rng);
        let starts: Vec<Pose> = order[..n].iter().map(|&v| Pose::at(v)).collect();
        order.shuffle(rng);
        let goals: Vec<Vec<Pose>> = order[..n].iter().map(|&v| vec![Pose::at(v)]).collect();

        Ok(Self::new(space, &starts, &goals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::collections::HashSet;
    use std::sync::Arc;

    const MAP: &str = "type octile\nheight 3\nwidth 4\nmap\n....\n.@..\n....\n";

    const SCEN: &str = "version 1\r\n\
        0\trandom.map\t4\t3\t0\t0\t3\t2\t5.0\r\n\
        0\trandom.map\t4\t3\t1\t1\t0\t2\t2.0\r\n\
        0\trandom.map\t4\t3\t3\t0\t0\t2\t5.0\r\n\
        0\trandom.map\t4\t3\t9\t0\t0\t2\t5.0\r\n\
        0\trandom.map\t4\t3\t2\t1\t1\t0\t2.0\r\n";

    fn space() -> StateSpace {
        StateSpace::new(Arc::new(Graph::from_map_str(MAP).unwrap()))
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line("1\tm.map\t4\t3\t0\t1\t2\t3\t4.5"),
            Some([0, 1, 2, 3])
        );
        assert_eq!(parse_line("version 1"), None);
        assert_eq!(parse_line("1\tm.txt\t4\t3\t0\t1\t2\t3\t4.5"), None);
        assert_eq!(parse_line("1\tm.map\t4\t3\t-1\t1\t2\t3\t4.5"), None);
        assert_eq!(parse_line("x\tm.map\t4\t3\t0\t1\t2\t3\t4.5"), None);
        assert_eq!(parse_line("1\tm.map\t4\t3\t0\t1\t2\t3\t"), None);
    }

    #[test]
    fn test_huge_coordinates_are_off_map() {
        let mut space = space();
        let text = "version 1\n\
            0\trandom.map\t4\t3\t4294967296\t0\t3\t2\t5.0\n\
            0\trandom.map\t4\t3\t0\t0\t3\t2\t5.0\n";
        let ins = Instance::from_scenario_str(&mut space, text, 1).unwrap();
        assert_eq!(ins.n, 1);

        let graph = Arc::clone(space.graph());
        assert_eq!(lookup(&graph, 4294967296, 0), None);
        assert_eq!(lookup(&graph, 0, 4294967297), None);
        assert_eq!(graph.vertex(space.vertex(ins.goal_sequences[0][0])).index, 11);

        let err = Instance::from_scenario_str(&mut space, text, 2).unwrap_err();
        assert!(matches!(
            err,
            LoadError::NotEnoughAgents {
                requested: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_scenario_skips_unusable_agents() {
        let mut space = space();
        let ins = Instance::from_scenario_str(&mut space, SCEN, 3).unwrap();
        assert_eq!(ins.n, 3);
        assert!(ins.is_valid(&space));

        let graph = Arc::clone(space.graph());
        let start_cells: Vec<usize> = ins
            .starts
            .iter()
            .map(|s| graph.vertex(space.vertex(s)).index)
            .collect();
        // (1, 1) is blocked and x = 9 is off the map
        assert_eq!(start_cells, vec![0, 3, 6]);
    }

    #[test]
    fn test_scenario_too_short() {
        let mut space = space();
        let err = Instance::from_scenario_str(&mut space, SCEN, 4).unwrap_err();
        assert!(matches!(
            err,
            LoadError::NotEnoughAgents {
                requested: 4,
                found: 3
            }
        ));
    }

    #[test]
    fn test_missing_scenario_file() {
        let mut space = space();
        let err = Instance::load_scenario(&mut space, "/nonexistent/agents.scen", 1).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_random_instance() {
        let mut space = space();
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let ins = Instance::random(&mut space, &mut rng, 5).unwrap();
        assert!(ins.is_valid(&space));

        let starts: HashSet<usize> = ins.starts.iter().map(|s| space.vertex(s)).collect();
        let goals: HashSet<usize> = ins
            .goal_sequences
            .iter()
            .map(|g| space.vertex(g[0]))
            .collect();
        assert_eq!(starts.len(), 5);
        assert_eq!(goals.len(), 5);

        let err = Instance::random(&mut space, &mut rng, 12).unwrap_err();
        assert!(matches!(
            err,
            LoadError::TooManyAgents {
                requested: 12,
                available: 11
            }
        ));
    }
}
