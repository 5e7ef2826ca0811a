// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Vertex occupancy for fast collision checks.

use crate::engine::AgentId;
use crate::graph::VertexId;
use crate::trail::TrailedVec;

/// Vertex to the agent holding it, if any.
///
/// Conflicts are per vertex: two agents with different facings on the same
/// cell still collide.
#[derive(Debug, Clone)]
pub struct OccupancyTable {
    cells: TrailedVec<Option<AgentId>>,
}

impl OccupancyTable {
    /// An empty table over `size` vertices.
    pub fn new(size: usize) -> Self {
        Self {
            cells: TrailedVec::new(size, None),
        }
    }

    pub fn get(&self, vertex: VertexId) -> Option<AgentId> {
        self.cells.get(vertex)
    }

    pub fn is_free(&self, vertex: VertexId) -> bool {
        self.get(vertex).is_none()
    }

    pub fn reserve(&mut self, vertex: VertexId, agent: AgentId) {
        self.cells.set(vertex, Some(agent));
    }

    pub fn release(&mut self, vertex: VertexId) {
        self.cells.set(vertex, None);
    }

    /// Free every vertex.
    pub fn clear(&mut self) {
        self.cells.reset();
    }

    /// Number of vertices covered.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_release_clear() {
        let mut table = OccupancyTable::new(5);
        assert!(table.is_free(3));

        table.reserve(3, 0);
        table.reserve(1, 2);
        assert_eq!(table.get(3), Some(0));
        assert_eq!(table.get(1), Some(2));

        table.release(3);
        assert!(table.is_free(3));

        table.clear();
        assert!((0..table.len()).all(|v| table.is_free(v)));
    }
}
