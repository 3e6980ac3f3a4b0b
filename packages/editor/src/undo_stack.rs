//! # Undo/Redo Stack
//!
//! Bounded history of prior document snapshots.
//!
//! ## Design
//!
//! - Recording a snapshot clears the redo stack
//! - Undo swaps the present for the newest undo entry and parks the present on the redo stack
//! - Redo is the mirror image
//! - Both stacks drop their oldest entry once they exceed the capacity
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::with_capacity(100);
//!
//! stack.record(present.clone());
//! present = edit(present);
//!
//! if let Some(previous) = stack.undo(present.clone()) {
//!     present = previous;
//! }
//! ```

use std::collections::VecDeque;

/// Undo/redo stack over snapshots of type `T`
#[derive(Debug, Clone, PartialEq)]
pub struct UndoStack<T> {
    /// Prior snapshots (most recent last)
    undo_stack: VecDeque<T>,

    /// Undone snapshots (most recent last)
    redo_stack: VecDeque<T>,

    /// Maximum number of levels per stack (0 = unlimited)
    capacity: usize,
}

impl<T> UndoStack<T> {
    /// Create an undo stack with the default capacity (100)
    pub fn new() -> Self {
        Self::with_capacity(crate::settings::DEFAULT_UNDO_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            capacity,
        }
    }

    /// Record the state before a mutation
    pub fn record(&mut self, snapshot: T) {
        push_bounded(&mut self.undo_stack, snapshot, self.capacity);

        // New action invalidates the future
        self.redo_stack.clear();
    }

    /// Step back: returns the snapshot to restore, or `None` when there is nothing to undo
    pub fn undo(&mut self, present: T) -> Option<T> {
        let previous = self.undo_stack.pop_back()?;
        push_bounded(&mut self.redo_stack, present, self.capacity);
        Some(previous)
    }

    pub fn redo(&mut self, present: T) -> Option<T> {
        let next = self.redo_stack.pop_back()?;
        push_bounded(&mut self.undo_stack, present, self.capacity);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity, dropping the oldest entries that no longer fit
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        trim(&mut self.undo_stack, capacity);
        trim(&mut self.redo_stack, capacity);
    }

    /// Iterate undo entries from oldest to newest
    pub fn undo_entries(&self) -> impl Iterator<Item = &T> {
        self.undo_stack.iter()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl<T> Default for UndoStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn push_bounded<T>(stack: &mut VecDeque<T>, entry: T, capacity: usize) {
    stack.push_back(entry);
    trim(stack, capacity);
}

fn trim<T>(stack: &mut VecDeque<T>, capacity: usize) {
    if capacity == 0 {
        return;
    }
    while stack.len() > capacity {
        stack.pop_front();
    }
}
