//! The per-type list container shared by data sets and edit sets.

use crate::config::Config;
use crate::crypto::FieldCipher;
use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::list::EntityList;
use crate::resolve::Resolver;
use crate::static_data::StaticData;
use crate::types::{ItemId, ItemType, ListStyle};
use crate::validation::validate_item;
use crate::value::FieldId;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// One list per item type, all of the same style, plus the shared
/// configuration, static tables and field cipher.
///
/// Lists are kept in dependency order, so iterating the map visits
/// referenced types before the types that reference them.
#[derive(Clone)]
pub struct ListMap {
    style: ListStyle,
    lists: BTreeMap<ItemType, EntityList>,
    config: Arc<Config>,
    statics: Arc<StaticData>,
    cipher: Arc<dyn FieldCipher>,
}

impl ListMap {
    /// Creates a map with no lists.
    pub fn new(
        style: ListStyle,
        config: Arc<Config>,
        statics: Arc<StaticData>,
        cipher: Arc<dyn FieldCipher>,
    ) -> Self {
        Self {
            style,
            lists: BTreeMap::new(),
            config,
            statics,
            cipher,
        }
    }

    /// Creates a map with an empty list for every item type.
    pub fn with_all_lists(
        style: ListStyle,
        config: Arc<Config>,
        statics: Arc<StaticData>,
        cipher: Arc<dyn FieldCipher>,
    ) -> Self {
        let mut map = Self::new(style, config, statics, cipher);
        for item_type in ItemType::ALL {
            let list = EntityList::new(item_type, style, Arc::clone(&map.statics));
            map.lists.insert(item_type, list);
        }
        map
    }

    /// Creates an empty map of another style sharing this map's
    /// configuration, tables and cipher.
    #[must_use]
    pub fn empty_like(&self, style: ListStyle) -> Self {
        Self::new(
            style,
            Arc::clone(&self.config),
            Arc::clone(&self.statics),
            Arc::clone(&self.cipher),
        )
    }

    /// Shared configuration.
    #[must_use]
    pub fn shared_config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Shared static tables.
    #[must_use]
    pub fn shared_statics(&self) -> &Arc<StaticData> {
        &self.statics
    }

    /// Field cipher used for sealed fields.
    #[must_use]
    pub fn cipher(&self) -> &Arc<dyn FieldCipher> {
        &self.cipher
    }

    /// Replaces the cipher.
    pub fn set_cipher(&mut self, cipher: Arc<dyn FieldCipher>) {
        self.cipher = cipher;
    }

    /// Registers a list, returning the list it replaced.
    ///
    /// # Errors
    ///
    /// Fails if the list's style differs from the map's.
    pub fn insert_list(&mut self, list: EntityList) -> CoreResult<Option<EntityList>> {
        if list.style() != self.style {
            return Err(CoreError::invalid_operation(format!(
                "cannot register a {} list in a {} set",
                list.style(),
                self.style
            )));
        }
        Ok(self.lists.insert(list.item_type(), list))
    }

    /// Unregisters the list of a type.
    pub fn remove_list(&mut self, item_type: ItemType) -> Option<EntityList> {
        self.lists.remove(&item_type)
    }

    /// Returns the list of a type.
    ///
    /// # Errors
    ///
    /// Returns `MissingList` if no list of the type is registered.
    pub fn require_list(&self, item_type: ItemType) -> CoreResult<&EntityList> {
        self.lists
            .get(&item_type)
            .ok_or_else(|| CoreError::missing_list(item_type))
    }

    /// Returns the list of a type for modification.
    ///
    /// # Errors
    ///
    /// Returns `MissingList` if no list of the type is registered.
    pub fn list_mut(&mut self, item_type: ItemType) -> CoreResult<&mut EntityList> {
        self.lists
            .get_mut(&item_type)
            .ok_or_else(|| CoreError::missing_list(item_type))
    }

    /// Iterates the registered lists in dependency order.
    pub fn lists(&self) -> impl Iterator<Item = &EntityList> {
        self.lists.values()
    }

    /// Looks up an item, deleted or not.
    #[must_use]
    pub fn item(&self, item_type: ItemType, id: ItemId) -> Option<&Entity> {
        self.lists.get(&item_type)?.find_item_by_id(id)
    }

    /// Resolves the links of every live item of one list.
    ///
    /// All items are checked before any link is marked, so a failure leaves
    /// the whole list unresolved. Deleted items are skipped and keep no
    /// resolved links.
    ///
    /// # Errors
    ///
    /// Returns `MissingList` for the list or a link target's list, or
    /// `UnresolvedLink` for the first link whose target is missing or
    /// deleted.
    pub fn resolve_list_links(&mut self, item_type: ItemType) -> CoreResult<()> {
        let style = self.style;
        {
            let resolver: &Self = self;
            for item in resolver.require_list(item_type)?.iter() {
                item.check_links(resolver)?;
            }
        }
        for item in self.list_mut(item_type)?.items_mut() {
            if item.is_deleted() {
                item.clear_link_resolution();
            } else {
                item.mark_links_resolved(style);
            }
        }
        Ok(())
    }

    /// Resolves every list in dependency order.
    ///
    /// # Errors
    ///
    /// Stops at the first list that fails to resolve.
    pub fn resolve_all_links(&mut self) -> CoreResult<()> {
        let types: Vec<ItemType> = self.lists.keys().copied().collect();
        for item_type in types {
            self.resolve_list_links(item_type)?;
        }
        debug!(style = %self.style, "resolved all links");
        Ok(())
    }

    /// Resolves the links of one item.
    ///
    /// # Errors
    ///
    /// As [`Entity::resolve_links`], or `ItemNotFound`.
    pub fn resolve_item_links(&mut self, item_type: ItemType, id: ItemId) -> CoreResult<()> {
        let style = self.style;
        let resolver: &Self = self;
        let item = resolver
            .item(item_type, id)
            .ok_or_else(|| CoreError::item_not_found(item_type, id))?;
        if item.is_deleted() {
            return Ok(());
        }
        item.check_links(resolver)?;
        if let Some(item) = self.list_mut(item_type)?.item_mut(id) {
            item.mark_links_resolved(style);
        }
        Ok(())
    }

    /// Rebuilds the attribute set of every owner from the live records in
    /// its info list.
    ///
    /// # Errors
    ///
    /// Returns `MalformedValues` if an owner has two live records of the
    /// same class.
    pub fn rebuild_attribute_sets(&mut self) -> CoreResult<()> {
        for owner_type in ItemType::ALL {
            if let Some(info_type) = owner_type.info_type() {
                self.rebuild_owner_sets(owner_type, info_type)?;
            }
        }
        Ok(())
    }

    fn rebuild_owner_sets(&mut self, owner_type: ItemType, info_type: ItemType) -> CoreResult<()> {
        let records: Vec<_> = match self.lists.get(&info_type) {
            Some(list) => list
                .iter()
                .filter_map(|record| {
                    let owner = record.link(FieldId::Owner)?.id;
                    Some((owner, record.info_class()?, record.id()))
                })
                .collect(),
            None => Vec::new(),
        };
        let Some(owners) = self.lists.get_mut(&owner_type) else {
            return Ok(());
        };
        for owner in owners.items_mut() {
            if let Some(set) = owner.attributes_mut() {
                set.clear();
            }
        }
        for (owner, class, record) in records {
            let Some(set) = owners.item_mut(owner).and_then(Entity::attributes_mut) else {
                continue;
            };
            if let Some(previous) = set.register(class, record) {
                return Err(CoreError::malformed_values(
                    info_type,
                    format!("{owner_type} {owner} has {class} records {previous} and {record}"),
                ));
            }
        }
        Ok(())
    }

    /// Validates every item, storing the errors on the items. Returns the
    /// number of items with errors.
    pub fn validate_all(&mut self) -> usize {
        let resolver: &Self = self;
        let results: Vec<_> = resolver
            .lists
            .values()
            .flat_map(|list| list.iter_all())
            .map(|item| (item.item_type(), item.id(), validate_item(resolver, item)))
            .collect();

        let mut failing = 0;
        for (item_type, id, errors) in results {
            if errors.has_errors() {
                failing += 1;
            }
            if let Some(item) = self.lists.get_mut(&item_type).and_then(|l| l.item_mut(id)) {
                item.set_errors(errors);
            }
        }
        failing
    }

    /// Validates one item, storing the errors on it. Returns true if the
    /// item has errors.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if the item does not exist.
    pub fn validate_one(&mut self, item_type: ItemType, id: ItemId) -> CoreResult<bool> {
        let resolver: &Self = self;
        let item = resolver
            .item(item_type, id)
            .ok_or_else(|| CoreError::item_not_found(item_type, id))?;
        let errors = validate_item(resolver, item);
        let failing = errors.has_errors();
        if let Some(item) = self.list_mut(item_type)?.item_mut(id) {
            item.set_errors(errors);
        }
        Ok(failing)
    }

    /// Items whose last validation recorded errors.
    pub fn items_with_errors(&self) -> impl Iterator<Item = &Entity> {
        self.lists
            .values()
            .flat_map(|list| list.iter())
            .filter(|item| item.has_errors())
    }

    /// Rebuilds the uniqueness index of every list.
    pub fn update_maps(&mut self) {
        for list in self.lists.values_mut() {
            list.update_maps();
        }
    }
}

impl Resolver for ListMap {
    fn style(&self) -> ListStyle {
        self.style
    }

    fn list(&self, item_type: ItemType) -> Option<&EntityList> {
        self.lists.get(&item_type)
    }

    fn statics(&self) -> &StaticData {
        &self.statics
    }

    fn config(&self) -> &Config {
        &self.config
    }
}

impl fmt::Debug for ListMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListMap")
            .field("style", &self.style)
            .field("lists", &self.lists.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PlainCipher;
    use crate::info::InfoClass;
    use crate::types::Currency;
    use crate::value::{FieldValue, ValuesIn};

    fn map() -> ListMap {
        ListMap::with_all_lists(
            ListStyle::Core,
            Arc::new(Config::default()),
            Arc::new(StaticData::standard()),
            Arc::new(PlainCipher),
        )
    }

    fn add(map: &mut ListMap, item_type: ItemType, values: ValuesIn) {
        let cipher = Arc::clone(map.cipher());
        map.list_mut(item_type)
            .unwrap()
            .add_values_item(&values, cipher.as_ref())
            .unwrap();
    }

    fn cash_account(id: u32, category: u32) -> ValuesIn {
        ValuesIn::new(ItemId::new(id))
            .with(FieldId::Name, FieldValue::text("Wallet"))
            .with(
                FieldId::Category,
                FieldValue::link(ItemType::CashCategory, ItemId::new(category)),
            )
            .with(FieldId::Currency, FieldValue::Currency(Currency::new("GBP")))
    }

    fn cash_category(id: u32) -> ValuesIn {
        ValuesIn::new(ItemId::new(id))
            .with(FieldId::Name, FieldValue::text("Cash"))
            .with(FieldId::CategoryType, FieldValue::Integer(1))
    }

    #[test]
    fn resolution_marks_links_with_style() {
        let mut map = map();
        add(&mut map, ItemType::CashCategory, cash_category(1));
        add(&mut map, ItemType::Cash, cash_account(1, 1));

        map.resolve_all_links().unwrap();
        let link = map
            .item(ItemType::Cash, ItemId::new(1))
            .unwrap()
            .link(FieldId::Category)
            .unwrap();
        assert_eq!(link.resolved_style(), Some(ListStyle::Core));
    }

    #[test]
    fn failed_resolution_leaves_list_unresolved() {
        let mut map = map();
        add(&mut map, ItemType::CashCategory, cash_category(1));
        add(&mut map, ItemType::Cash, cash_account(1, 1));
        add(&mut map, ItemType::Cash, cash_account(2, 9));

        let err = map.resolve_list_links(ItemType::Cash).unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnresolvedLink { target_id, .. } if target_id == ItemId::new(9)
        ));
        let first = map.item(ItemType::Cash, ItemId::new(1)).unwrap();
        assert!(!first.link(FieldId::Category).unwrap().is_resolved());
    }

    #[test]
    fn deleted_target_does_not_resolve() {
        let mut map = map();
        add(&mut map, ItemType::CashCategory, cash_category(1));
        add(&mut map, ItemType::Cash, cash_account(1, 1));
        map.list_mut(ItemType::CashCategory)
            .unwrap()
            .delete_item(ItemId::new(1))
            .unwrap();

        assert!(map.resolve_list_links(ItemType::Cash).is_err());
    }

    #[test]
    fn missing_target_list_is_reported() {
        let mut map = ListMap::new(
            ListStyle::Core,
            Arc::new(Config::default()),
            Arc::new(StaticData::standard()),
            Arc::new(PlainCipher),
        );
        map.insert_list(EntityList::new(
            ItemType::Cash,
            ListStyle::Core,
            Arc::clone(map.shared_statics()),
        ))
        .unwrap();
        add(&mut map, ItemType::Cash, cash_account(1, 1));

        assert_eq!(
            map.resolve_all_links().unwrap_err(),
            CoreError::missing_list(ItemType::CashCategory)
        );
    }

    #[test]
    fn second_record_of_a_class_is_rejected() {
        let mut map = map();
        add(&mut map, ItemType::CashCategory, cash_category(1));
        add(&mut map, ItemType::Cash, cash_account(1, 1));
        for id in [1, 2] {
            add(
                &mut map,
                ItemType::CashInfo,
                ValuesIn::new(ItemId::new(id))
                    .with(FieldId::Owner, FieldValue::link(ItemType::Cash, ItemId::new(1)))
                    .with(FieldId::InfoClass, FieldValue::Integer(InfoClass::Notes.id().into()))
                    .with(FieldId::Value, FieldValue::text("note")),
            );
        }

        assert!(matches!(
            map.rebuild_attribute_sets(),
            Err(CoreError::MalformedValues { .. })
        ));
    }

    #[test]
    fn style_mismatch_is_rejected() {
        let mut map = map();
        let edit = EntityList::new(
            ItemType::Payee,
            ListStyle::Edit,
            Arc::new(StaticData::standard()),
        );
        assert!(map.insert_list(edit).is_err());
    }
}
