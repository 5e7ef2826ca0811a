// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! A fixed-size table whose writes are recorded on its own trail.

use super::Trail;

/// A vector that records every change for later rewinding.
///
/// # Example
///
/// ```
/// use lacam::trail::TrailedVec;
///
/// let mut table = TrailedVec::new(4, 0u32);
/// table.set(1, 10);
/// table.set(2, 20);
/// assert_eq!(table.get(2), 20);
/// table.reset();
/// assert_eq!(table.get(1), 0);
/// assert_eq!(table.get(2), 0);
/// ```
#[derive(Debug, Clone)]
pub struct TrailedVec<T: Copy> {
    values: Vec<T>,
    trail: Trail<T>,
}

impl<T: Copy> TrailedVec<T> {
    /// A table of `len` slots, all holding `initial`.
    pub fn new(len: usize, initial: T) -> Self {
        Self {
            values: vec![initial; len],
            trail: Trail::new(),
        }
    }

    /// # Panics
    ///
    /// Panics if `slot` is out of range.
    pub fn get(&self, slot: usize) -> T {
        self.values[slot]
    }

    /// Set the value, recording the old value in the trail.
    pub fn set(&mut self, slot: usize, value: T) {
        self.trail.record_change(slot, self.values[slot]);
        self.values[slot] = value;
    }

    /// Undo every write since construction (or the previous reset).
    pub fn reset(&mut self) {
        self.trail.rewind_all(&mut self.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_reset() {
        let mut table = TrailedVec::new(3, None);
        table.set(0, Some(4usize));
        table.set(2, Some(5));
        table.set(0, Some(6));
        assert_eq!(table.get(0), Some(6));
        assert_eq!(table.trail.len(), 3);

        table.reset();
        assert_eq!(table.get(0), None);
        assert_eq!(table.get(2), None);
        assert!(table.trail.is_empty());
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_repeated_resets() {
        let mut table = TrailedVec::new(2, 0u8);
        table.set(0, 1);
        table.reset();
        table.set(1, 2);
        table.set(1, 3);
        table.reset();
        assert_eq!((table.get(0), table.get(1)), (0, 0));
    }
}
