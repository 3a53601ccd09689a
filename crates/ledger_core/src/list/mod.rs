//! Id-indexed lists of items of one type.

mod map;

pub use map::ListMap;

use crate::category::CategoryClass;
use crate::crypto::FieldCipher;
use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::index::{DataMap, MapKeys};
use crate::static_data::StaticData;
use crate::types::{ItemId, ItemType, ListStyle};
use crate::value::ValuesIn;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Exclusive upper bound of item ids.
const ID_LIMIT: u64 = 1 << 32;

/// An ordered collection of items of one concrete type.
///
/// Items are kept in insertion order and addressed by id through a slot
/// table. Ids come from a single counter and are never reused while the
/// list is open. The uniqueness index is updated in the same call that
/// adds, edits or deletes an item.
#[derive(Debug, Clone)]
pub struct EntityList {
    item_type: ItemType,
    style: ListStyle,
    statics: Arc<StaticData>,
    items: Vec<Entity>,
    slots: HashMap<ItemId, usize>,
    next_id: u64,
    maps: DataMap,
}

impl EntityList {
    /// Creates an empty list.
    #[must_use]
    pub fn new(item_type: ItemType, style: ListStyle, statics: Arc<StaticData>) -> Self {
        Self {
            item_type,
            style,
            statics,
            items: Vec::new(),
            slots: HashMap::new(),
            next_id: 1,
            maps: DataMap::new(),
        }
    }

    /// Creates an empty list of the same type continuing this list's ids.
    #[must_use]
    pub fn empty_like(&self, style: ListStyle) -> Self {
        let mut list = Self::new(self.item_type, style, Arc::clone(&self.statics));
        list.next_id = self.next_id;
        list
    }

    /// Returns the item type.
    #[must_use]
    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// Returns the list style.
    #[must_use]
    pub fn style(&self) -> ListStyle {
        self.style
    }

    /// Returns the static tables the list classifies categories with.
    #[must_use]
    pub fn statics(&self) -> &Arc<StaticData> {
        &self.statics
    }

    /// Number of live items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Number of items including deleted ones.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list holds no live item.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// The id the next new item will get, or `None` once every id has
    /// been handed out.
    #[must_use]
    pub fn next_id(&self) -> Option<ItemId> {
        u32::try_from(self.next_id).ok().map(ItemId::new)
    }

    fn allocate_id(&self) -> CoreResult<ItemId> {
        self.next_id()
            .ok_or_else(|| CoreError::id_out_of_range("item id", self.next_id, ID_LIMIT))
    }

    /// Adds an item built from loader values.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if the id is taken, leaving the list unchanged,
    /// or any error of [`Entity::from_values`].
    pub fn add_values_item(
        &mut self,
        values: &ValuesIn,
        cipher: &dyn FieldCipher,
    ) -> CoreResult<&Entity> {
        let id = match values.id {
            Some(id) => id,
            None => self.allocate_id()?,
        };
        if self.slots.contains_key(&id) {
            warn!(item_type = %self.item_type, %id, "rejected duplicate id");
            return Err(CoreError::duplicate_id(self.item_type, id));
        }
        let item = Entity::from_values(self.item_type, self.style, id, values, cipher)?;
        Ok(self.insert(item))
    }

    /// Adds an empty new item and returns its id.
    ///
    /// # Errors
    ///
    /// Only edit lists accept new items.
    pub fn add_new_item(&mut self) -> CoreResult<ItemId> {
        if self.style != ListStyle::Edit {
            return Err(CoreError::invalid_operation(format!(
                "new {} items can only be added to an edit list",
                self.item_type
            )));
        }
        let id = self.allocate_id()?;
        if self.slots.contains_key(&id) {
            return Err(CoreError::duplicate_id(self.item_type, id));
        }
        self.insert(Entity::new_item(self.item_type, self.style, id));
        Ok(id)
    }

    /// Adds a copy of an item of another list, keeping its id.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if the id is taken, or `InvalidOperation` if
    /// the item is of another type.
    pub fn add_copy_item(&mut self, source: &Entity) -> CoreResult<&Entity> {
        self.insert_entity(source.copy(self.style))
    }

    pub(crate) fn insert_entity(&mut self, item: Entity) -> CoreResult<&Entity> {
        if item.item_type() != self.item_type {
            return Err(CoreError::invalid_operation(format!(
                "cannot add {} to {} list",
                item.item_type(),
                self.item_type
            )));
        }
        if self.slots.contains_key(&item.id()) {
            return Err(CoreError::duplicate_id(self.item_type, item.id()));
        }
        Ok(self.insert(item))
    }

    fn insert(&mut self, item: Entity) -> &Entity {
        let id = item.id();
        let keys = self.map_keys(&item);
        self.maps.insert(id, &keys);
        self.next_id = self.next_id.max(u64::from(id.as_u32()) + 1);
        self.slots.insert(id, self.items.len());
        self.items.push(item);
        &self.items[self.items.len() - 1]
    }

    /// Looks up an item, deleted or not.
    #[must_use]
    pub fn find_item_by_id(&self, id: ItemId) -> Option<&Entity> {
        self.slots.get(&id).map(|index| &self.items[*index])
    }

    /// Looks up the first live item with a name.
    #[must_use]
    pub fn find_item_by_name(&self, name: &str) -> Option<&Entity> {
        self.maps
            .find_by_name(name)
            .and_then(|id| self.find_item_by_id(id))
    }

    /// Returns true if an item with the id exists, deleted or not.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Iterates live items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.items.iter().filter(|item| !item.is_deleted())
    }

    /// Iterates every item, deleted ones included.
    pub fn iter_all(&self) -> impl Iterator<Item = &Entity> {
        self.items.iter()
    }

    /// Mutates an item, keeping the index in step.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if no item has the id.
    pub fn edit_item<R>(&mut self, id: ItemId, f: impl FnOnce(&mut Entity) -> R) -> CoreResult<R> {
        let index = *self
            .slots
            .get(&id)
            .ok_or_else(|| CoreError::item_not_found(self.item_type, id))?;
        let old = self.map_keys(&self.items[index]);
        let result = f(&mut self.items[index]);
        let new = self.map_keys(&self.items[index]);
        self.maps.adjust(id, &old, &new);
        Ok(result)
    }

    /// Mutable access for changes that never touch indexed values.
    pub(crate) fn item_mut(&mut self, id: ItemId) -> Option<&mut Entity> {
        let index = *self.slots.get(&id)?;
        Some(&mut self.items[index])
    }

    pub(crate) fn items_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.items.iter_mut()
    }

    /// Marks an item deleted. Deleted items stay in the list but leave the
    /// index and live iteration.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if no item has the id.
    pub fn delete_item(&mut self, id: ItemId) -> CoreResult<()> {
        self.edit_item(id, |item| item.set_deleted(true))
    }

    /// Removes an item altogether. Used to back out an item that was never
    /// visible outside the current call.
    pub(crate) fn discard_item(&mut self, id: ItemId) {
        if let Some(index) = self.slots.remove(&id) {
            let item = self.items.remove(index);
            let keys = self.map_keys(&item);
            self.maps.remove(id, &keys);
            self.reindex_slots();
        }
    }

    /// Drops deleted items, returning how many were removed.
    pub fn purge_deleted(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.is_deleted());
        self.reindex_slots();
        before - self.items.len()
    }

    fn reindex_slots(&mut self) {
        self.slots = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| (item.id(), index))
            .collect();
    }

    /// Builds the edit copy of this list.
    ///
    /// Every live item is copied with its id and values and no history. The
    /// copy continues this list's id counter so new items never clash.
    #[must_use]
    pub fn derive_edit_list(&self) -> EntityList {
        let mut list = self.empty_like(ListStyle::Edit);
        for item in self.iter() {
            list.insert(item.copy(ListStyle::Edit));
        }
        debug!(item_type = %self.item_type, items = list.items.len(), "derived edit list");
        list
    }

    /// Builds a deep copy of this list, deleted items and pending state
    /// included.
    #[must_use]
    pub fn derive_clone_list(&self) -> EntityList {
        let mut list = self.empty_like(ListStyle::Clone);
        for item in &self.items {
            list.insert(item.copy_with_state(ListStyle::Clone));
        }
        list
    }

    /// Rebuilds the uniqueness index from scratch.
    pub fn update_maps(&mut self) {
        self.maps.reset();
        for index in 0..self.items.len() {
            let keys = self.map_keys(&self.items[index]);
            self.maps.insert(self.items[index].id(), &keys);
        }
        trace!(item_type = %self.item_type, "rebuilt maps");
    }

    /// Returns `base` if no live item uses it, else the first of `base1`,
    /// `base2`, ... that is free.
    #[must_use]
    pub fn unique_name(&self, base: &str) -> String {
        if self.maps.name_count(base) == 0 {
            return base.to_string();
        }
        (1u32..)
            .map(|n| format!("{base}{n}"))
            .find(|name| self.maps.name_count(name) == 0)
            .unwrap_or_else(|| base.to_string())
    }

    /// Number of live items with a name.
    #[must_use]
    pub fn name_count(&self, name: &str) -> usize {
        self.maps.name_count(name)
    }

    /// Number of live categories of a class.
    #[must_use]
    pub fn class_count(&self, class: CategoryClass) -> usize {
        self.maps.class_count(class)
    }

    /// First live category of a class.
    #[must_use]
    pub fn class_instance(&self, class: CategoryClass) -> Option<&Entity> {
        self.maps
            .class_instance(class)
            .and_then(|id| self.find_item_by_id(id))
    }

    /// Class of a category of this list's family.
    #[must_use]
    pub fn class_of(&self, item: &Entity) -> Option<CategoryClass> {
        let family = item.item_type().category_family()?;
        self.statics.class_of(family, item.category_type()?)
    }

    fn map_keys(&self, item: &Entity) -> MapKeys {
        if item.is_deleted() {
            return MapKeys::default();
        }
        MapKeys {
            name: item.name().map(str::to_string),
            class: self.class_of(item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::TransactionClass;
    use crate::crypto::PlainCipher;
    use crate::value::{FieldId, FieldValue};

    fn list(style: ListStyle) -> EntityList {
        EntityList::new(
            ItemType::TransactionCategory,
            style,
            Arc::new(StaticData::standard()),
        )
    }

    fn category(id: u32, name: &str, class: TransactionClass) -> ValuesIn {
        use crate::category::ClassRules;
        ValuesIn::new(ItemId::new(id))
            .with(FieldId::Name, FieldValue::text(name))
            .with(FieldId::CategoryType, FieldValue::Integer(class.id().into()))
    }

    #[test]
    fn duplicate_id_leaves_list_unchanged() {
        let mut list = list(ListStyle::Core);
        list.add_values_item(&category(3, "Food", TransactionClass::Expense), &PlainCipher)
            .unwrap();
        let err = list
            .add_values_item(&category(3, "Drink", TransactionClass::Expense), &PlainCipher)
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::duplicate_id(ItemType::TransactionCategory, ItemId::new(3))
        );
        assert_eq!(list.len(), 1);
        assert_eq!(list.name_count("Drink"), 0);
        assert_eq!(list.find_item_by_id(ItemId::new(3)).unwrap().name(), Some("Food"));
    }

    #[test]
    fn ids_are_never_reused() {
        let mut list = list(ListStyle::Core);
        list.add_values_item(&category(7, "A", TransactionClass::Expense), &PlainCipher)
            .unwrap();
        assert_eq!(list.next_id(), Some(ItemId::new(8)));

        let unnumbered = ValuesIn::unnumbered().with(FieldId::Name, FieldValue::text("B"));
        let id = list.add_values_item(&unnumbered, &PlainCipher).unwrap().id();
        assert_eq!(id, ItemId::new(8));

        list.delete_item(id).unwrap();
        list.purge_deleted();
        assert_eq!(list.next_id(), Some(ItemId::new(9)));
    }

    #[test]
    fn highest_id_exhausts_the_counter() {
        let mut core = list(ListStyle::Core);
        core.add_values_item(&category(u32::MAX, "Last", TransactionClass::Expense), &PlainCipher)
            .unwrap();
        assert_eq!(core.next_id(), None);

        let unnumbered = ValuesIn::unnumbered().with(FieldId::Name, FieldValue::text("B"));
        let err = core.add_values_item(&unnumbered, &PlainCipher).unwrap_err();
        assert!(matches!(err, CoreError::IdOutOfRange { .. }));

        let mut edit = core.derive_edit_list();
        let err = edit.add_new_item().unwrap_err();
        assert!(matches!(err, CoreError::IdOutOfRange { .. }));
        assert_eq!(edit.total_len(), 1);
        assert_eq!(edit.find_item_by_id(ItemId::new(u32::MAX)).unwrap().name(), Some("Last"));
    }

    #[test]
    fn index_follows_edits_and_deletes() {
        let mut list = list(ListStyle::Core);
        list.add_values_item(&category(1, "Food", TransactionClass::Expense), &PlainCipher)
            .unwrap();
        list.add_values_item(&category(2, "Food", TransactionClass::Expense), &PlainCipher)
            .unwrap();
        assert_eq!(list.name_count("Food"), 2);

        list.edit_item(ItemId::new(2), |item| {
            item.set_unchecked(FieldId::Name, Some(FieldValue::text("Drink")));
        })
        .unwrap();
        assert_eq!(list.name_count("Food"), 1);
        assert_eq!(list.find_item_by_name("Drink").unwrap().id(), ItemId::new(2));

        list.delete_item(ItemId::new(1)).unwrap();
        assert_eq!(list.name_count("Food"), 0);
        assert!(list.find_item_by_name("Food").is_none());
        assert_eq!(list.len(), 1);
        assert_eq!(list.total_len(), 2);
    }

    #[test]
    fn class_counts() {
        let mut list = list(ListStyle::Core);
        let totals = CategoryClass::Transaction(TransactionClass::Totals);
        list.add_values_item(&category(1, "Total", TransactionClass::Totals), &PlainCipher)
            .unwrap();
        list.add_values_item(&category(2, "Total2", TransactionClass::Totals), &PlainCipher)
            .unwrap();
        assert_eq!(list.class_count(totals), 2);
        assert_eq!(list.class_instance(totals).unwrap().id(), ItemId::new(1));

        list.delete_item(ItemId::new(1)).unwrap();
        assert_eq!(list.class_count(totals), 1);
        assert_eq!(list.class_instance(totals).unwrap().id(), ItemId::new(2));
    }

    #[test]
    fn new_items_only_in_edit_lists() {
        let mut core = list(ListStyle::Core);
        assert!(matches!(
            core.add_new_item(),
            Err(CoreError::InvalidOperation { .. })
        ));

        let mut edit = list(ListStyle::Edit);
        let id = edit.add_new_item().unwrap();
        assert!(edit.find_item_by_id(id).unwrap().is_new());
    }

    #[test]
    fn edit_list_is_an_independent_copy() {
        let mut core = list(ListStyle::Core);
        for (id, name) in [(1, "A"), (2, "B"), (3, "C")] {
            core.add_values_item(&category(id, name, TransactionClass::Expense), &PlainCipher)
                .unwrap();
        }
        core.delete_item(ItemId::new(2)).unwrap();

        let mut edit = core.derive_edit_list();
        assert_eq!(edit.style(), ListStyle::Edit);
        assert_eq!(edit.len(), core.len());
        assert!(edit.find_item_by_id(ItemId::new(2)).is_none());
        assert_eq!(edit.next_id(), core.next_id());

        edit.edit_item(ItemId::new(1), |item| {
            item.set_unchecked(FieldId::Name, Some(FieldValue::text("Z")));
        })
        .unwrap();
        assert_eq!(core.find_item_by_id(ItemId::new(1)).unwrap().name(), Some("A"));
        assert_eq!(core.name_count("A"), 1);
    }

    #[test]
    fn unique_names() {
        let mut list = list(ListStyle::Core);
        assert_eq!(list.unique_name("New"), "New");
        list.add_values_item(&category(1, "New", TransactionClass::Expense), &PlainCipher)
            .unwrap();
        list.add_values_item(&category(2, "New1", TransactionClass::Expense), &PlainCipher)
            .unwrap();
        assert_eq!(list.unique_name("New"), "New2");
    }

    #[test]
    fn copy_of_other_type_is_rejected() {
        let mut list = list(ListStyle::Core);
        let payee = Entity::new_item(ItemType::Payee, ListStyle::Edit, ItemId::new(1));
        assert!(matches!(
            list.add_copy_item(&payee),
            Err(CoreError::InvalidOperation { .. })
        ));
    }
}
