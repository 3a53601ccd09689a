//! Snapshot history for speculative edits.
//!
//! The editor pattern is push, mutate, check: [`HistoryTracker::push_history`]
//! snapshots the live values, the caller mutates them freely, and
//! [`HistoryTracker::check_for_history`] either keeps the snapshot (something
//! changed) or drops it again (nothing did). None of this can fail.

use crate::value::{FieldId, ValueBag};

/// Live values plus a stack of earlier snapshots.
#[derive(Debug, Clone, Default)]
pub struct HistoryTracker {
    current: ValueBag,
    stack: Vec<ValueBag>,
}

impl HistoryTracker {
    /// Creates a tracker with no history.
    #[must_use]
    pub fn new(values: ValueBag) -> Self {
        Self {
            current: values,
            stack: Vec::new(),
        }
    }

    /// Returns the live values.
    #[must_use]
    pub fn values(&self) -> &ValueBag {
        &self.current
    }

    pub(crate) fn values_mut(&mut self) -> &mut ValueBag {
        &mut self.current
    }

    /// Snapshots the live values.
    pub fn push_history(&mut self) {
        self.stack.push(self.current.clone());
    }

    /// Compares the live values with the last snapshot.
    ///
    /// Drops the snapshot and returns false if nothing differs; keeps it and
    /// returns true otherwise. Without a snapshot there is nothing to compare
    /// against and the result is false.
    pub fn check_for_history(&mut self) -> bool {
        match self.stack.last() {
            Some(last) if *last == self.current => {
                self.stack.pop();
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Restores the last snapshot, discarding the live values.
    pub fn pop_history(&mut self) {
        if let Some(last) = self.stack.pop() {
            self.current = last;
        }
    }

    /// Restores the snapshot taken at `version` and drops everything after it.
    ///
    /// Versions count snapshots: version 0 is the state before the first
    /// push. Rewinding to the current version or beyond does nothing.
    pub fn rewind_to(&mut self, version: usize) {
        if version < self.stack.len() {
            self.current = self.stack[version].clone();
            self.stack.truncate(version);
        }
    }

    /// Number of snapshots held.
    #[must_use]
    pub fn version(&self) -> usize {
        self.stack.len()
    }

    /// Returns true if any snapshot is held.
    #[must_use]
    pub fn has_history(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Returns the most recent snapshot.
    #[must_use]
    pub fn last_snapshot(&self) -> Option<&ValueBag> {
        self.stack.last()
    }

    /// Returns the oldest known values: the first snapshot, or the live
    /// values when there is no history.
    #[must_use]
    pub fn original(&self) -> &ValueBag {
        self.stack.first().unwrap_or(&self.current)
    }

    /// Fields that differ between the original and the live values.
    #[must_use]
    pub fn changed_fields(&self) -> Vec<FieldId> {
        self.original().differing_fields(&self.current)
    }

    /// Returns true if the live values differ from the original.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        *self.original() != self.current
    }

    /// Forgets all snapshots, keeping the live values.
    pub fn clear_history(&mut self) {
        self.stack.clear();
    }

    pub(crate) fn set_original(&mut self, original: ValueBag) {
        self.stack.clear();
        self.stack.push(original);
    }
}
