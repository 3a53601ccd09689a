//! Per-owner attribute record index.

use crate::info::InfoClass;
use crate::types::ItemId;
use std::collections::BTreeMap;

/// Maps each attribute class of an owner to the id of its record in the
/// owner's info list. At most one record per class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    items: BTreeMap<InfoClass, ItemId>,
}

impl AttributeSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record id of a class.
    #[must_use]
    pub fn get(&self, class: InfoClass) -> Option<ItemId> {
        self.items.get(&class).copied()
    }

    /// Returns true if a record of the class is registered.
    #[must_use]
    pub fn contains(&self, class: InfoClass) -> bool {
        self.items.contains_key(&class)
    }

    /// Registers a record, returning the id it replaced.
    pub fn register(&mut self, class: InfoClass, id: ItemId) -> Option<ItemId> {
        self.items.insert(class, id)
    }

    /// Removes the record of a class.
    pub fn deregister(&mut self, class: InfoClass) -> Option<ItemId> {
        self.items.remove(&class)
    }

    /// Iterates registered records in class order.
    pub fn iter(&self) -> impl Iterator<Item = (InfoClass, ItemId)> + '_ {
        self.items.iter().map(|(class, id)| (*class, *id))
    }

    /// Number of registered records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Forgets every record.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_record_per_class() {
        let mut set = AttributeSet::new();
        assert_eq!(set.register(InfoClass::Notes, ItemId::new(1)), None);
        assert_eq!(
            set.register(InfoClass::Notes, ItemId::new(2)),
            Some(ItemId::new(1))
        );
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(InfoClass::Notes), Some(ItemId::new(2)));

        assert_eq!(set.deregister(InfoClass::Notes), Some(ItemId::new(2)));
        assert!(set.is_empty());
    }
}
