//! Undo/redo history over whole-state snapshots.
//!
//! A linear list of snapshots with a cursor pointing at the current one.
//! Saving after an undo discards everything past the cursor; saving past
//! the capacity drops the oldest entries.
//!
//! Entries are owned copies: `save` clones what it is given and `undo` /
//! `redo` hand back clones, so neither side can reach into the other's data.

use crate::types::MAX_HISTORY_STATES;

#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<T>,
    /// Index of the current entry; meaningless while `entries` is empty.
    index: usize,
    max_states: usize,
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self::new(MAX_HISTORY_STATES)
    }
}

impl<T: Clone> History<T> {
    /// An empty history holding at most `max_states` entries (minimum 1).
    pub fn new(max_states: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            max_states: max_states.max(1),
        }
    }

    /// Reset to a single entry.
    pub fn init(&mut self, state: &T) {
        self.entries.clear();
        self.entries.push(state.clone());
        self.index = 0;
    }

    /// Record a new current state, discarding any redo entries.
    pub fn save(&mut self, state: &T) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(state.clone());

        if self.entries.len() > self.max_states {
            let excess = self.entries.len() - self.max_states;
            self.entries.drain(0..excess);
        }
        self.index = self.entries.len() - 1;
    }

    /// Step back. `None` when already at the oldest entry.
    pub fn undo(&mut self) -> Option<T> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(self.entries[self.index].clone())
    }

    /// Step forward. `None` when already at the newest entry.
    pub fn redo(&mut self) -> Option<T> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(self.entries[self.index].clone())
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.index + 1 < self.entries.len()
    }

    pub fn current(&self) -> Option<&T> {
        self.entries.get(self.index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn max_states(&self) -> usize {
        self.max_states
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_cannot_move() {
        let mut h: History<u32> = History::default();
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert_eq!(h.undo(), None);
        assert_eq!(h.redo(), None);
        assert_eq!(h.current(), None);
    }

    #[test]
    fn init_resets_to_one_entry() {
        let mut h = History::new(10);
        h.init(&1);
        h.save(&2);
        h.init(&7);
        assert_eq!(h.len(), 1);
        assert_eq!(h.index(), 0);
        assert_eq!(h.current(), Some(&7));
    }

    #[test]
    fn undo_redo_walks_the_list() {
        let mut h = History::new(10);
        h.init(&0);
        h.save(&1);
        h.save(&2);
        assert_eq!(h.undo(), Some(1));
        assert_eq!(h.undo(), Some(0));
        assert_eq!(h.undo(), None);
        assert_eq!(h.redo(), Some(1));
        assert_eq!(h.redo(), Some(2));
        assert_eq!(h.redo(), None);
    }

    #[test]
    fn save_after_undo_truncates_future() {
        let mut h = History::new(10);
        h.init(&0);
        h.save(&1);
        h.save(&2);
        h.undo();
        h.save(&3);
        assert!(!h.can_redo());
        assert_eq!(h.len(), 3);
        assert_eq!(h.undo(), Some(1));
        assert_eq!(h.redo(), Some(3));
    }

    #[test]
    fn eviction_keeps_most_recent() {
        let max = 5;
        let extra = 3;
        let mut h = History::new(max);
        h.init(&0);
        for v in 1..=(max + extra) {
            h.save(&v);
        }
        assert_eq!(h.len(), max);
        assert_eq!(h.index(), max - 1);
        assert_eq!(h.current(), Some(&(max + extra)));

        let mut oldest = None;
        while let Some(v) = h.undo() {
            oldest = Some(v);
        }
        // First save was 1; the survivor is `extra` saves after it.
        assert_eq!(oldest, Some(1 + extra));
    }

    #[test]
    fn returned_entries_are_copies() {
        let mut h = History::new(10);
        h.init(&vec![1]);
        h.save(&vec![2]);
        let mut back = h.undo().unwrap();
        back.push(99);
        assert_eq!(h.current(), Some(&vec![1]));

        let mut live = vec![5];
        h.save(&live);
        live.push(6);
        assert_eq!(h.current(), Some(&vec![5]));
    }
}
