// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Trail-based undo for per-step lookup tables.
//!
//! Every write to a trailed table records the slot and its previous value.
//! Rewinding replays the trail backwards, so restoring a table costs time
//! proportional to the number of writes, not to the size of the table. The
//! conflict resolver relies on this to clear its per-vertex occupancy tables
//! at the start of every call.

pub mod trailed;

pub use trailed::TrailedVec;

/// A single entry in the trail, recording one write.
#[derive(Debug, Clone, Copy)]
struct TrailEntry<T> {
    /// Slot of the table that was written.
    slot: usize,
    /// The value before the write.
    old_value: T,
}

/// Undo log for a table of `T`.
///
/// The trail does not own the table; [`Trail::rewind_all`] is handed the
/// slice to restore. [`TrailedVec`] bundles the two.
#[derive(Debug, Clone)]
pub struct Trail<T: Copy> {
    /// All writes recorded so far.
    entries: Vec<TrailEntry<T>>,
}

impl<T: Copy> Trail<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn record_change(&mut self, slot: usize, old_value: T) {
        self.entries.push(TrailEntry { slot, old_value });
    }

    /// Undo every recorded write, newest first.
    pub fn rewind_all(&mut self, values: &mut [T]) {
        while let Some(entry) = self.entries.pop() {
            values[entry.slot] = entry.old_value;
        }
    }

    /// Number of writes recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Copy> Default for Trail<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_new() {
        let trail: Trail<u8> = Trail::new();
        assert_eq!(trail.len(), 0);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_rewind_all_restores_in_reverse() {
        let mut values = [None, None];
        let mut trail = Trail::new();

        // the same slot written twice must end at its oldest value
        trail.record_change(0, values[0]);
        values[0] = Some(1);
        trail.record_change(0, values[0]);
        values[0] = Some(2);
        trail.record_change(1, values[1]);
        values[1] = Some(3);
        assert_eq!(trail.len(), 3);

        trail.rewind_all(&mut values);
        assert_eq!(values, [None, None]);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_rewind_all_leaves_untrailed_slots() {
        let mut values = [5u32, 6, 7];
        let mut trail = Trail::new();
        trail.record_change(1, values[1]);
        values[1] = 60;

        trail.rewind_all(&mut values);
        assert_eq!(values, [5, 6, 7]);
    }
}
