//! # Snapshot History
//!
//! Linear undo/redo over full copies of the page list.
//!
//! ## Design
//!
//! - `entries` holds deep copies; nothing is shared with the live pages
//! - `index` points at the snapshot matching the live state
//! - Pushing a snapshot drops every entry after `index` (the redo branch)
//! - When `entries` grows past `capacity`, the oldest entry is evicted and
//!   `index` shifts down so it keeps pointing at the same snapshot
//! - Never empty: the baseline entry is installed by `reset`

use tracing::{debug, trace};

use super::model::Page;

/// Default maximum number of snapshots kept.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Array of page snapshots plus a cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Vec<Page>>,
    index: usize,
    capacity: usize,
}

impl History {
    /// Creates a history whose only entry is `baseline`.
    pub fn new(baseline: &[Page]) -> Self {
        Self::with_capacity(baseline, DEFAULT_MAX_HISTORY)
    }

    /// Creates a history with a custom capacity (minimum 1).
    pub fn with_capacity(baseline: &[Page], capacity: usize) -> Self {
        Self {
            entries: vec![baseline.to_vec()],
            index: 0,
            capacity: capacity.max(1),
        }
    }

    /// Replaces all entries with a single baseline.
    pub fn reset(&mut self, baseline: &[Page]) {
        self.entries.clear();
        self.entries.push(baseline.to_vec());
        self.index = 0;
    }

    /// Records `pages` as the newest snapshot, discarding any redo branch.
    pub fn push(&mut self, pages: &[Page]) {
        self.entries.truncate(self.index + 1);
        self.entries.push(pages.to_vec());
        self.index = self.entries.len() - 1;

        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
            self.index -= excess;
            debug!(evicted = excess, capacity = self.capacity, "history full, evicted oldest snapshots");
        }
        trace!(index = self.index, len = self.entries.len(), "snapshot saved");
    }

    /// Steps back and returns a copy of that snapshot, or None at the start.
    pub fn undo(&mut self) -> Option<Vec<Page>> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        trace!(index = self.index, "undo");
        Some(self.entries[self.index].clone())
    }

    /// Steps forward and returns a copy of that snapshot, or None at the end.
    pub fn redo(&mut self) -> Option<Vec<Page>> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        trace!(index = self.index, "redo");
        Some(self.entries[self.index].clone())
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true once constructed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor into the snapshot list.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The snapshot under the cursor.
    pub fn current(&self) -> &[Page] {
        &self.entries[self.index]
    }

    /// All snapshots, oldest first.
    pub fn entries(&self) -> &[Vec<Page>] {
        &self.entries
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(&[])
    }
}
