//! Index traits.

use crate::types::ItemId;
use std::fmt::Debug;
use std::hash::Hash;

/// A key that can be indexed.
pub trait IndexKey: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> IndexKey for T {}

/// Core index trait.
///
/// Indexes map keys to the ids of live items carrying them, in insertion
/// order. Updates never fail; the owning list applies them in the same call
/// that adds, edits or deletes the item.
pub trait Index<K: IndexKey> {
    /// Adds an id under a key. Adding the same pair twice has no effect.
    fn insert(&mut self, key: K, id: ItemId);

    /// Removes an id from a key, returning true if it was present.
    fn remove(&mut self, key: &K, id: ItemId) -> bool;

    /// Ids stored under a key, oldest first.
    fn lookup(&self, key: &K) -> &[ItemId];

    /// Number of ids stored under a key.
    fn count(&self, key: &K) -> usize {
        self.lookup(key).len()
    }

    /// Checks if the index contains a key.
    fn contains(&self, key: &K) -> bool {
        !self.lookup(key).is_empty()
    }

    /// Returns the number of entries in the index.
    fn len(&self) -> usize;

    /// Returns true if the index is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the index.
    fn clear(&mut self);
}
