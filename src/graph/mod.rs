// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The shared environment: free cells of a 4-connected grid.
//!
//! This module contains the immutable graph model:
//! - Vertex: a free cell with coordinates and adjacency
//! - Orientation: optional facing of an agent
//! - Graph: the vertex set, built once from a map and never modified
//!
//! Poses (vertex + orientation + goal stage) live in [`crate::memo`], because
//! they are interned lazily during search.

pub mod map;
pub mod orientation;
pub mod vertex;

pub use map::GridMap;
pub use orientation::Orientation;
pub use vertex::{Vertex, VertexId};

use std::path::Path;

use crate::error::LoadError;

/// Undirected 4-connected grid graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Free cells, indexed by [`VertexId`].
    vertices: Vec<Vertex>,

    /// Cell index (`width * y + x`) to vertex, `None` for obstacles.
    cells: Vec<Option<VertexId>>,

    pub width: usize,
    pub height: usize,
}

impl Graph {
    /// Build the graph of a parsed grid map.
    pub fn from_grid(grid: &GridMap) -> Self {
        let (width, height, free) = (grid.width, grid.height, &grid.free);

        let mut vertices = Vec::new();
        let mut cells = vec![None; width * height];
        for y in 0..height {
            for x in 0..width {
                let index = width * y + x;
                if free[index] {
                    let id = vertices.len();
                    vertices.push(Vertex::new(id, index, x as i32, y as i32));
                    cells[index] = Some(id);
                }
            }
        }

        let mut graph = Self {
            vertices,
            cells,
            width,
            height,
        };
        for id in 0..graph.vertices.len() {
            let (x, y) = (graph.vertices[id].x, graph.vertices[id].y);
            let neighbors: Vec<VertexId> = [(x - 1, y), (x + 1, y), (x, y + 1), (x, y - 1)]
                .into_iter()
                .filter_map(|(nx, ny)| graph.at(nx, ny))
                .collect();
            graph.vertices[id].neighbors = neighbors;
        }
        graph
    }

    /// Parse a MovingAI map from text.
    pub fn from_map_str(text: &str) -> Result<Self, LoadError> {
        Ok(Self::from_grid(&GridMap::parse(text)?))
    }

    /// Load a MovingAI map file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_map_str(&text)
    }

    /// Number of vertices, |V|.
    pub fn size(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex by dense id.
    ///
    /// # Panics
    ///
    /// Panics if `id >= self.size()`.
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id]
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Vertex at a raw cell index, `None` for obstacles and out-of-range indices.
    pub fn cell(&self, index: usize) -> Option<VertexId> {
        self.cells.get(index).copied().flatten()
    }

    /// Vertex at grid coordinates, `None` outside the map or on obstacles.
    pub fn at(&self, x: i32, y: i32) -> Option<VertexId> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.cell(self.width * y as usize + x as usize)
    }

    /// The vertex one step from `from` along `(dx, dy)`, if it is adjacent.
    pub fn step(&self, from: VertexId, (dx, dy): (i32, i32)) -> Option<VertexId> {
        let v = &self.vertices[from];
        self.at(v.x + dx, v.y + dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP_3X3: &str = "type octile\nheight 3\nwidth 3\nmap\n...\n.@.\n...\n";

    #[test]
    fn test_build_graph() {
        let graph = Graph::from_map_str(MAP_3X3).unwrap();
        assert_eq!(graph.size(), 8);
        assert_eq!(graph.width, 3);
        assert_eq!(graph.height, 3);

        // cell 4 is the obstacle in the middle
        assert_eq!(graph.cell(4), None);
        assert_eq!(graph.cell(5), Some(4));
        assert_eq!(graph.cell(9), None);
    }

    #[test]
    fn test_neighbor_order() {
        let graph = Graph::from_map_str(MAP_3X3).unwrap();

        // corner (0,0): right then down a row
        let corner = graph.vertex(0);
        assert_eq!(corner.neighbors, vec![1, 3]);

        // (1,0): left, right; (1,1) is blocked
        let top = graph.vertex(1);
        assert_eq!(top.neighbors, vec![0, 2]);

        // (0,1): (1,1) blocked, then y+1 and y-1
        let left = graph.vertex(graph.at(0, 1).unwrap());
        assert_eq!(
            left.neighbors,
            vec![graph.at(0, 2).unwrap(), graph.at(0, 0).unwrap()]
        );
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let graph = Graph::from_map_str(MAP_3X3).unwrap();
        for v in graph.vertices() {
            for &u in &v.neighbors {
                assert!(graph.vertex(u).neighbors.contains(&v.id));
            }
        }
    }

    #[test]
    fn test_step() {
        let graph = Graph::from_map_str(MAP_3X3).unwrap();
        assert_eq!(graph.step(0, (1, 0)), Some(1));
        assert_eq!(graph.step(0, (-1, 0)), None);
        assert_eq!(graph.step(1, (0, 1)), None);
    }
}
