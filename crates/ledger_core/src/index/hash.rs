//! Hash index implementation.

use crate::index::traits::{Index, IndexKey};
use crate::types::ItemId;
use std::collections::HashMap;

/// Hash-based index for counting and equality lookups.
///
/// Stores a mapping from key to the ids carrying it (non-unique index), so
/// the count of a key is the number of live items sharing it and the first
/// id is the oldest instance.
///
/// # Example
///
/// ```rust,ignore
/// let mut names: HashIndex<String> = HashIndex::new();
/// names.insert("Food".to_string(), ItemId::new(1));
/// assert_eq!(names.count(&"Food".to_string()), 1);
/// ```
#[derive(Debug, Clone)]
pub struct HashIndex<K: IndexKey> {
    /// Key to item ids mapping.
    entries: HashMap<K, Vec<ItemId>>,
    /// Total entry count.
    count: usize,
}

impl<K: IndexKey> Default for HashIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: IndexKey> HashIndex<K> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            count: 0,
        }
    }

    /// Rebuilds the index from a set of key-id pairs.
    pub fn rebuild<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, ItemId)>,
    {
        self.clear();
        for (key, id) in entries {
            self.insert(key, id);
        }
    }

    /// Returns the first id stored under a key.
    #[must_use]
    pub fn first(&self, key: &K) -> Option<ItemId> {
        self.lookup(key).first().copied()
    }
}

impl<K: IndexKey> Index<K> for HashIndex<K> {
    fn insert(&mut self, key: K, id: ItemId) {
        let ids = self.entries.entry(key).or_default();
        if !ids.contains(&id) {
            ids.push(id);
            self.count += 1;
        }
    }

    fn remove(&mut self, key: &K, id: ItemId) -> bool {
        if let Some(ids) = self.entries.get_mut(key) {
            if let Some(pos) = ids.iter().position(|existing| *existing == id) {
                ids.remove(pos);
                self.count -= 1;
                if ids.is_empty() {
                    self.entries.remove(key);
                }
                return true;
            }
        }
        false
    }

    fn lookup(&self, key: &K) -> &[ItemId] {
        self.entries.get(key).map_or(&[][..], Vec::as_slice)
    }

    fn len(&self) -> usize {
        self.count
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.count = 0;
    }
}
