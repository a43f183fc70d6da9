//! # Undo/Redo Stack
//!
//! Snapshot history for a block list.
//!
//! ## Design
//!
//! - Each entry is a full copy of the block list, not a diff
//! - `push` records the state being left and clears the redo side
//! - `undo` returns the previous state and moves the current one to the
//!   front of the redo side; `redo` is the mirror image
//! - History is linear: no branches are kept after a new edit
//! - Depth is bounded by `max_levels`; the oldest entries are dropped first
//! - Supports batched edits (several mutations undone as one step)
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//!
//! // Before replacing `blocks` with `next`:
//! stack.push(blocks.clone());
//! blocks = next;
//!
//! // Undo hands back the previous list and remembers the current one
//! if let Some(previous) = stack.undo(blocks.clone()) {
//!     blocks = previous;
//! }
//! ```

use sitecraft_model::Block;
use std::collections::VecDeque;

/// One undo step: the block list as it was before the step
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub blocks: Vec<Block>,

    /// Optional description of this step
    pub description: Option<String>,
}

impl HistoryEntry {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Undo/redo stack of block list snapshots
#[derive(Debug)]
pub struct UndoStack {
    /// Earlier states (most recent last)
    past: Vec<HistoryEntry>,

    /// Undone states (most recently undone first)
    future: VecDeque<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Set while a batch is open; holds the snapshot taken when it opened
    current_batch: Option<Option<HistoryEntry>>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            past: Vec::new(),
            future: VecDeque::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Record the state being left by an edit.
    ///
    /// Clears the redo side unconditionally. Inside a batch only the first
    /// snapshot is kept, so the whole batch undoes to the pre-batch state.
    pub fn push(&mut self, snapshot: Vec<Block>) {
        self.push_entry(HistoryEntry::new(snapshot));
    }

    pub fn push_described(&mut self, snapshot: Vec<Block>, description: impl Into<String>) {
        self.push_entry(HistoryEntry::new(snapshot).with_description(description));
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.future.clear();

        if let Some(batch) = &mut self.current_batch {
            if batch.is_none() {
                *batch = Some(entry);
            }
            return;
        }

        self.push_past(entry);
    }

    fn push_past(&mut self, entry: HistoryEntry) {
        self.past.push(entry);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.past.len() > self.max_levels {
            let excess = self.past.len() - self.max_levels;
            self.past.drain(0..excess);
        }
    }

    /// Start a batch of edits (will be undone/redone together)
    pub fn begin_batch(&mut self) {
        if self.current_batch.is_none() {
            self.current_batch = Some(None);
        }
    }

    /// End the current batch and record it as one undo step
    pub fn end_batch(&mut self) {
        if let Some(Some(entry)) = self.current_batch.take() {
            self.push_past(entry);
        }
    }

    /// Set description for current batch (if batching and already recorded)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(Some(entry)) = &mut self.current_batch {
            entry.description = Some(description.into());
        }
    }

    pub fn in_batch(&self) -> bool {
        self.current_batch.is_some()
    }

    /// Step back. `current` is the state being left; it becomes the first
    /// redo entry. Returns `None` (and drops nothing) when there is no
    /// earlier state.
    pub fn undo(&mut self, current: Vec<Block>) -> Option<Vec<Block>> {
        let entry = self.past.pop()?;
        self.future.push_front(HistoryEntry {
            blocks: current,
            description: entry.description.clone(),
        });
        Some(entry.blocks)
    }

    /// Step forward again. Removes and returns the first redo entry; `current`
    /// goes back onto the undo side without clearing the remaining redo
    /// entries.
    pub fn redo(&mut self, current: Vec<Block>) -> Option<Vec<Block>> {
        let entry = self.future.pop_front()?;
        self.push_past(HistoryEntry {
            blocks: current,
            description: entry.description.clone(),
        });
        Some(entry.blocks)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.current_batch = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.past.last().and_then(|entry| entry.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.future.front().and_then(|entry| entry.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
