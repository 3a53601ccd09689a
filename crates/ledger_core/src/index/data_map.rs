//! Uniqueness index of one list.

use crate::category::CategoryClass;
use crate::index::{HashIndex, Index};
use crate::types::ItemId;

/// Index keys an item contributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapKeys {
    /// Plaintext name, if any.
    pub name: Option<String>,
    /// Category class, for categories with a known type row.
    pub class: Option<CategoryClass>,
}

/// Name counts plus class counts and first instances of a list.
///
/// Only live items are indexed. After every add, edit and delete the count
/// of a name equals the number of live items carrying it.
#[derive(Debug, Clone, Default)]
pub struct DataMap {
    names: HashIndex<String>,
    classes: HashIndex<CategoryClass>,
}

impl DataMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes an item.
    pub fn insert(&mut self, id: ItemId, keys: &MapKeys) {
        if let Some(name) = &keys.name {
            self.names.insert(name.clone(), id);
        }
        if let Some(class) = keys.class {
            self.classes.insert(class, id);
        }
    }

    /// Removes an item.
    pub fn remove(&mut self, id: ItemId, keys: &MapKeys) {
        if let Some(name) = &keys.name {
            self.names.remove(name, id);
        }
        if let Some(class) = keys.class {
            self.classes.remove(&class, id);
        }
    }

    /// Moves an item from its old keys to its new ones.
    pub fn adjust(&mut self, id: ItemId, old: &MapKeys, new: &MapKeys) {
        if old != new {
            self.remove(id, old);
            self.insert(id, new);
        }
    }

    /// Forgets everything.
    pub fn reset(&mut self) {
        self.names.clear();
        self.classes.clear();
    }

    /// Number of live items with a name.
    #[must_use]
    pub fn name_count(&self, name: &str) -> usize {
        self.names.count(&name.to_string())
    }

    /// First live item with a name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<ItemId> {
        self.names.first(&name.to_string())
    }

    /// Number of live categories of a class.
    #[must_use]
    pub fn class_count(&self, class: CategoryClass) -> usize {
        self.classes.count(&class)
    }

    /// First live category of a class.
    #[must_use]
    pub fn class_instance(&self, class: CategoryClass) -> Option<ItemId> {
        self.classes.first(&class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::TransactionClass;

    fn keys(name: &str, class: Option<CategoryClass>) -> MapKeys {
        MapKeys {
            name: Some(name.to_string()),
            class,
        }
    }

    #[test]
    fn counts_follow_adjustments() {
        let totals = Some(CategoryClass::Transaction(TransactionClass::Totals));
        let mut map = DataMap::new();
        map.insert(ItemId::new(1), &keys("Total", totals));
        map.insert(ItemId::new(2), &keys("Total", totals));
        assert_eq!(map.name_count("Total"), 2);
        assert_eq!(map.class_count(totals.unwrap()), 2);
        assert_eq!(map.class_instance(totals.unwrap()), Some(ItemId::new(1)));

        map.adjust(ItemId::new(1), &keys("Total", totals), &keys("Other", None));
        assert_eq!(map.name_count("Total"), 1);
        assert_eq!(map.find_by_name("Total"), Some(ItemId::new(2)));
        assert_eq!(map.class_instance(totals.unwrap()), Some(ItemId::new(2)));

        map.remove(ItemId::new(2), &keys("Total", totals));
        assert_eq!(map.name_count("Total"), 0);
        assert_eq!(map.class_count(totals.unwrap()), 0);

        map.reset();
        assert_eq!(map.name_count("Other"), 0);
    }
}
