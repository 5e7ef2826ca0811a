// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Vertex type for free grid cells.

use std::fmt;

/// Dense identifier of a vertex, `0..graph.size()`.
pub type VertexId = usize;

/// A free cell of the map.
///
/// Vertices are created once while the graph is built and never change
/// afterwards. `index` is the raw cell index `width * y + x`, which is what
/// scenario files and cell-based instance constructors refer to; `id` is the
/// dense position in the graph's vertex list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    /// Dense identifier.
    pub id: VertexId,

    /// Cell index in the full `width * height` grid.
    pub index: usize,

    /// Column.
    pub x: i32,

    /// Row.
    pub y: i32,

    /// Adjacent vertices, in the order x-1, x+1, y+1, y-1 (absent ones skipped).
    pub neighbors: Vec<VertexId>,
}

impl Vertex {
    /// Create an isolated vertex; edges are added by the graph builder.
    pub fn new(id: VertexId, index: usize, x: i32, y: i32) -> Self {
        Self {
            id,
            index,
            x,
            y,
            neighbors: Vec::with_capacity(4),
        }
    }

    /// Number of incident edges.
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_creation() {
        let v = Vertex::new(3, 17, 1, 2);
        assert_eq!(v.id, 3);
        assert_eq!(v.index, 17);
        assert_eq!(v.degree(), 0);
        assert_eq!(v.to_string(), "(1, 2)");
    }
}
