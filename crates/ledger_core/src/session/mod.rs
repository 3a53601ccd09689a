//! Edit sessions.
//!
//! An [`EditSet`] holds an edit-style copy of the lists of a data set. All
//! links inside it resolve against the edit lists, so a change to one item
//! is visible to every other item of the session before anything reaches
//! the core lists. Commit goes through
//! [`DataSet::commit`](crate::DataSet::commit); a session that is committed
//! or abandoned refuses further edits.

mod state;

pub use state::SessionState;

use crate::category::{default_values, CategoryDefaults};
use crate::config::Config;
use crate::crypto::FieldCipher;
use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::info::{InfoClass, InfoView, Requirement};
use crate::list::{EntityList, ListMap};
use crate::resolve::Resolver;
use crate::static_data::StaticData;
use crate::types::{ItemId, ItemType, ListStyle};
use crate::validation::ValidationErrors;
use crate::value::{FieldId, FieldValue};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An isolated, editable copy of a data set's lists.
#[derive(Debug)]
pub struct EditSet {
    state: SessionState,
    lists: ListMap,
    touched: BTreeSet<(ItemType, ItemId)>,
}

impl EditSet {
    pub(crate) fn new(lists: ListMap) -> Self {
        Self {
            state: SessionState::Active,
            lists,
            touched: BTreeSet::new(),
        }
    }

    /// Returns the session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns true while the session accepts edits.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub(crate) fn ensure_active(&self) -> CoreResult<()> {
        self.state.ensure_active()
    }

    /// Registers an edit copy of a core list and resolves it against the
    /// session.
    ///
    /// Lists must be derived in dependency order so every link target's
    /// list is already present.
    ///
    /// # Errors
    ///
    /// Fails if the session is not active or the copy does not resolve; the
    /// copy is not kept in that case.
    pub fn derive_list(&mut self, core: &EntityList) -> CoreResult<()> {
        self.ensure_active()?;
        let item_type = core.item_type();
        self.lists.insert_list(core.derive_edit_list())?;
        if let Err(err) = self
            .lists
            .resolve_list_links(item_type)
            .and_then(|()| self.lists.rebuild_attribute_sets())
        {
            warn!(%item_type, error = %err, "edit list does not resolve");
            self.lists.remove_list(item_type);
            return Err(err);
        }
        Ok(())
    }

    /// The edit lists.
    #[must_use]
    pub fn lists(&self) -> &ListMap {
        &self.lists
    }

    /// Looks up an item, deleted or not.
    #[must_use]
    pub fn item(&self, item_type: ItemType, id: ItemId) -> Option<&Entity> {
        self.lists.item(item_type, id)
    }

    /// Attribute view of a live owner.
    #[must_use]
    pub fn info_view(&self, owner_type: ItemType, id: ItemId) -> Option<InfoView<'_>> {
        let owner = self.lookup(owner_type, id)?;
        Some(InfoView::new(self, owner))
    }

    /// The cipher sealed fields are written with.
    #[must_use]
    pub fn cipher(&self) -> Arc<dyn FieldCipher> {
        Arc::clone(self.lists.cipher())
    }

    /// Items added, changed or deleted in this session, in dependency order.
    pub fn touched(&self) -> impl Iterator<Item = (ItemType, ItemId)> + '_ {
        self.touched.iter().copied()
    }

    fn live(&self, item_type: ItemType, id: ItemId) -> CoreResult<&Entity> {
        self.lookup(item_type, id)
            .ok_or_else(|| CoreError::item_not_found(item_type, id))
    }

    /// Adds a new item with initial field values.
    ///
    /// The values go through the checked setter and the links must resolve
    /// inside the session. Attribute records are created through
    /// [`set_info_value`](Self::set_info_value) instead.
    ///
    /// # Errors
    ///
    /// Fails if a value is rejected or a link does not resolve; the item is
    /// not added in that case.
    pub fn add_new_item(
        &mut self,
        item_type: ItemType,
        fields: Vec<(FieldId, FieldValue)>,
    ) -> CoreResult<ItemId> {
        self.ensure_active()?;
        if item_type.info_owner().is_some() {
            return Err(CoreError::invalid_operation(
                "attribute records are created through their owner",
            ));
        }

        let cipher = self.cipher();
        let list = self.lists.list_mut(item_type)?;
        let id = list.add_new_item()?;
        let filled = list
            .edit_item(id, |item| {
                fields
                    .into_iter()
                    .try_for_each(|(field, value)| item.set_value(field, Some(value), cipher.as_ref()))
            })
            .and_then(|result| result)
            .and_then(|()| self.lists.resolve_item_links(item_type, id));
        if let Err(err) = filled {
            if let Ok(list) = self.lists.list_mut(item_type) {
                list.discard_item(id);
            }
            return Err(err);
        }

        self.touched.insert((item_type, id));
        self.lists.validate_one(item_type, id)?;
        debug!(%item_type, %id, "added new item");
        Ok(id)
    }

    /// Adds a new category below `parent` with its default type and a
    /// generated unique name.
    ///
    /// # Errors
    ///
    /// As [`default_values`] and [`add_new_item`](Self::add_new_item).
    pub fn add_new_category(
        &mut self,
        item_type: ItemType,
        parent: Option<ItemId>,
    ) -> CoreResult<ItemId> {
        self.ensure_active()?;
        let defaults = default_values(&self.lists, item_type, parent)?;
        let mut fields = vec![
            (FieldId::Name, FieldValue::text(defaults.name)),
            (
                FieldId::CategoryType,
                FieldValue::Integer(defaults.category_type.into()),
            ),
        ];
        if let Some(parent) = parent {
            fields.push((FieldId::Parent, FieldValue::link(item_type, parent)));
        }
        self.add_new_item(item_type, fields)
    }

    /// Re-derives the type, name and parent of an existing category from
    /// `parent`.
    ///
    /// # Errors
    ///
    /// As [`default_values`], or if the category does not exist.
    pub fn set_category_defaults(
        &mut self,
        item_type: ItemType,
        id: ItemId,
        parent: Option<ItemId>,
    ) -> CoreResult<CategoryDefaults> {
        self.ensure_active()?;
        self.live(item_type, id)?;
        let defaults = default_values(&self.lists, item_type, parent)?;
        let cipher = self.cipher();
        let ((), changed) = self.apply_edit(item_type, id, |item| {
            item.set_value(
                FieldId::CategoryType,
                Some(FieldValue::Integer(defaults.category_type.into())),
                cipher.as_ref(),
            )?;
            item.set_value(
                FieldId::Name,
                Some(FieldValue::text(defaults.name.clone())),
                cipher.as_ref(),
            )?;
            item.set_value(
                FieldId::Parent,
                parent.map(|parent| FieldValue::link(item_type, parent)),
                cipher.as_ref(),
            )
        })?;
        if changed {
            self.lists.validate_one(item_type, id)?;
        }
        Ok(defaults)
    }

    /// Runs `f` on a live item between a history push and check.
    ///
    /// A failing `f` restores the item. A change whose links no longer
    /// resolve is rolled back.
    fn apply_edit<R>(
        &mut self,
        item_type: ItemType,
        id: ItemId,
        f: impl FnOnce(&mut Entity) -> CoreResult<R>,
    ) -> CoreResult<(R, bool)> {
        self.ensure_active()?;
        self.live(item_type, id)?;
        let (value, changed) = self.lists.list_mut(item_type)?.edit_item(id, |item| {
            item.push_history();
            match f(item) {
                Ok(value) => Ok((value, item.check_for_history())),
                Err(err) => {
                    item.pop_history();
                    Err(err)
                }
            }
        })??;

        if changed {
            if let Err(err) = self.lists.resolve_item_links(item_type, id) {
                warn!(%item_type, %id, error = %err, "rolled back edit");
                self.lists.list_mut(item_type)?.edit_item(id, Entity::pop_history)?;
                return Err(err);
            }
            self.touched.insert((item_type, id));
        }
        Ok((value, changed))
    }

    /// Mutates a live item and re-validates it if anything changed.
    ///
    /// # Errors
    ///
    /// Fails if the item does not exist or its links no longer resolve.
    /// Attribute records must be changed through their owner.
    pub fn edit_item<R>(
        &mut self,
        item_type: ItemType,
        id: ItemId,
        f: impl FnOnce(&mut Entity) -> R,
    ) -> CoreResult<R> {
        if item_type.info_owner().is_some() {
            return Err(CoreError::invalid_operation(
                "attribute records are edited through their owner",
            ));
        }
        let (value, changed) = self.apply_edit(item_type, id, |item| Ok(f(item)))?;
        if changed {
            self.lists.validate_one(item_type, id)?;
        }
        Ok(value)
    }

    /// Sets one field of a live item through the checked setter. Returns
    /// true if the value changed.
    ///
    /// Attribute fields of an owner (`Notes`, `AutoPayee`, ...) are routed
    /// to the owner's attribute records.
    ///
    /// # Errors
    ///
    /// As [`Entity::set_value`], plus link resolution failures.
    pub fn set_value(
        &mut self,
        item_type: ItemType,
        id: ItemId,
        field: FieldId,
        value: Option<FieldValue>,
    ) -> CoreResult<bool> {
        if item_type.field_spec(field).is_none() && item_type.info_type().is_some() {
            if let Some(class) = InfoClass::from_field(field) {
                return self.set_info_value(item_type, id, class, value);
            }
        }
        if item_type.info_owner().is_some() {
            return Err(CoreError::invalid_operation(
                "attribute records are edited through their owner",
            ));
        }
        let cipher = self.cipher();
        let ((), changed) = self.apply_edit(item_type, id, |item| {
            item.set_value(field, value, cipher.as_ref())
        })?;
        if changed {
            self.lists.validate_one(item_type, id)?;
        }
        Ok(changed)
    }

    /// Marks a live item deleted.
    ///
    /// Deleting an owner deletes its attribute records; deleting an
    /// attribute record clears it from its owner.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidOperation` while another live item links to the
    /// item.
    pub fn delete_item(&mut self, item_type: ItemType, id: ItemId) -> CoreResult<()> {
        self.ensure_active()?;
        let item = self.live(item_type, id)?;

        if let Some(owner_type) = item_type.info_owner() {
            let owner = item.link(FieldId::Owner).map(|link| link.id);
            if let (Some(owner), Some(class)) = (owner, item.info_class()) {
                return self.set_info_value(owner_type, owner, class, None).map(|_| ());
            }
        }

        if let Some((other_type, other)) = self.referrer(item_type, id) {
            return Err(CoreError::invalid_operation(format!(
                "{item_type} {id} is still referenced by {other_type} {other}"
            )));
        }

        if let Some(info_type) = item_type.info_type() {
            let records: Vec<ItemId> = item
                .attributes()
                .map(|set| set.iter().map(|(_, record)| record).collect())
                .unwrap_or_default();
            for record in records {
                self.lists.list_mut(info_type)?.delete_item(record)?;
                self.touched.insert((info_type, record));
            }
            if let Some(set) = self
                .lists
                .list_mut(item_type)?
                .item_mut(id)
                .and_then(Entity::attributes_mut)
            {
                set.clear();
            }
        }

        self.lists.list_mut(item_type)?.delete_item(id)?;
        self.touched.insert((item_type, id));
        debug!(%item_type, %id, "deleted item");
        Ok(())
    }

    /// First live item linking to the given item, other than its own
    /// attribute records.
    fn referrer(&self, item_type: ItemType, id: ItemId) -> Option<(ItemType, ItemId)> {
        self.lists
            .lists()
            .flat_map(|list| list.iter())
            .filter(|item| {
                let own_record = item.item_type().info_owner() == Some(item_type)
                    && item.link(FieldId::Owner).is_some_and(|link| link.id == id);
                !own_record
            })
            .find(|item| {
                item.values()
                    .links()
                    .any(|(_, link)| link.item_type == item_type && link.id == id)
            })
            .map(|item| (item.item_type(), item.id()))
    }

    /// Sets, replaces or clears an owner's attribute of one class. Returns
    /// true if anything changed.
    ///
    /// A record is created when a value is first set and deleted when the
    /// value is cleared. The owner is re-validated after every change.
    ///
    /// # Errors
    ///
    /// Fails if the owner type carries no attributes, the owner does not
    /// exist, the value has the wrong kind for the class or a linked value
    /// does not resolve.
    pub fn set_info_value(
        &mut self,
        owner_type: ItemType,
        owner_id: ItemId,
        class: InfoClass,
        value: Option<FieldValue>,
    ) -> CoreResult<bool> {
        self.ensure_active()?;
        let info_type = owner_type.info_type().ok_or_else(|| {
            CoreError::invalid_operation(format!("{owner_type} items carry no attributes"))
        })?;
        let existing = self
            .live(owner_type, owner_id)?
            .attributes()
            .and_then(|set| set.get(class));

        let changed = match (existing, value) {
            (None, None) => false,
            (None, Some(value)) => {
                self.create_record(owner_type, owner_id, info_type, class, value)?;
                true
            }
            (Some(record), Some(value)) => {
                let cipher = self.cipher();
                let ((), changed) = self.apply_edit(info_type, record, |item| {
                    item.set_value(FieldId::Value, Some(value), cipher.as_ref())
                })?;
                changed
            }
            (Some(record), None) => {
                self.lists.list_mut(info_type)?.delete_item(record)?;
                if let Some(set) = self
                    .lists
                    .list_mut(owner_type)?
                    .item_mut(owner_id)
                    .and_then(Entity::attributes_mut)
                {
                    set.deregister(class);
                }
                self.touched.insert((info_type, record));
                true
            }
        };

        if changed {
            self.touched.insert((owner_type, owner_id));
            self.lists.validate_one(owner_type, owner_id)?;
        }
        Ok(changed)
    }

    fn create_record(
        &mut self,
        owner_type: ItemType,
        owner_id: ItemId,
        info_type: ItemType,
        class: InfoClass,
        value: FieldValue,
    ) -> CoreResult<ItemId> {
        let cipher = self.cipher();
        let list = self.lists.list_mut(info_type)?;
        let id = list.add_new_item()?;
        let filled = list
            .edit_item(id, |record| {
                record.set_unchecked(FieldId::Owner, Some(FieldValue::link(owner_type, owner_id)));
                record.set_unchecked(
                    FieldId::InfoClass,
                    Some(FieldValue::Integer(class.id().into())),
                );
                record.set_value(FieldId::Value, Some(value), cipher.as_ref())
            })
            .and_then(|result| result)
            .and_then(|()| self.lists.resolve_item_links(info_type, id));
        if let Err(err) = filled {
            if let Ok(list) = self.lists.list_mut(info_type) {
                list.discard_item(id);
            }
            return Err(err);
        }

        if let Some(set) = self
            .lists
            .list_mut(owner_type)?
            .item_mut(owner_id)
            .and_then(Entity::attributes_mut)
        {
            set.register(class, id);
        }
        self.touched.insert((info_type, id));
        Ok(id)
    }

    /// Sets an attribute to its default value, if the class has one and a
    /// candidate exists. Returns true if a value was set.
    ///
    /// # Errors
    ///
    /// As [`set_info_value`](Self::set_info_value).
    pub fn set_default_value(
        &mut self,
        owner_type: ItemType,
        owner_id: ItemId,
        class: InfoClass,
    ) -> CoreResult<bool> {
        let owner = self.live(owner_type, owner_id)?;
        let default = InfoView::new(&self.lists, owner).default_value(class);
        match default {
            Some(value) => self.set_info_value(owner_type, owner_id, class, Some(value)),
            None => Ok(false),
        }
    }

    /// Brings an owner's attributes in line with its current category:
    /// attributes that are no longer allowed are cleared and newly required
    /// ones are defaulted where possible.
    ///
    /// # Errors
    ///
    /// Fails if the owner type carries no attributes or the owner does not
    /// exist.
    pub fn auto_correct(&mut self, owner_type: ItemType, owner_id: ItemId) -> CoreResult<()> {
        self.ensure_active()?;
        if owner_type.info_type().is_none() {
            return Err(CoreError::invalid_operation(format!(
                "{owner_type} items carry no attributes"
            )));
        }
        let (forbidden, required) = {
            let owner = self.live(owner_type, owner_id)?;
            let view = InfoView::new(&self.lists, owner);
            let mut forbidden = Vec::new();
            let mut required = Vec::new();
            for class in InfoClass::ALL {
                match (view.is_class_required(class), view.record(class).is_some()) {
                    (Requirement::NotAllowed, true) => forbidden.push(class),
                    (Requirement::MustExist, false) => required.push(class),
                    _ => {}
                }
            }
            (forbidden, required)
        };

        for class in forbidden {
            self.set_info_value(owner_type, owner_id, class, None)?;
        }
        for class in required {
            self.set_default_value(owner_type, owner_id, class)?;
        }
        Ok(())
    }

    /// Validates every item of the session. Returns the number of items
    /// with errors.
    pub fn validate(&mut self) -> usize {
        self.lists.validate_all()
    }

    /// Validates one item and returns its errors.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if the item does not exist.
    pub fn validate_item(
        &mut self,
        item_type: ItemType,
        id: ItemId,
    ) -> CoreResult<&ValidationErrors> {
        self.lists.validate_one(item_type, id)?;
        self.lists
            .item(item_type, id)
            .map(Entity::errors)
            .ok_or_else(|| CoreError::item_not_found(item_type, id))
    }

    /// Returns true if a live touched item carries validation errors from
    /// its last validation.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.touched_with_errors() > 0
    }

    pub(crate) fn touched_with_errors(&self) -> usize {
        self.touched
            .iter()
            .filter_map(|(item_type, id)| self.lists.item(*item_type, *id))
            .filter(|item| !item.is_deleted() && item.has_errors())
            .count()
    }

    /// Discards the session. Later edits fail.
    ///
    /// # Errors
    ///
    /// Fails if the session is no longer active.
    pub fn abandon(&mut self) -> CoreResult<()> {
        self.ensure_active()?;
        self.state = SessionState::Abandoned;
        info!(touched = self.touched.len(), "abandoned edit set");
        Ok(())
    }

    pub(crate) fn mark_committed(&mut self) {
        self.state = SessionState::Committed;
    }
}

impl Resolver for EditSet {
    fn style(&self) -> ListStyle {
        self.lists.style()
    }

    fn list(&self, item_type: ItemType) -> Option<&EntityList> {
        self.lists.list(item_type)
    }

    fn statics(&self) -> &StaticData {
        self.lists.statics()
    }

    fn config(&self) -> &Config {
        self.lists.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{CategoryClass, TransactionClass};
    use crate::dataset::DataSet;
    use crate::test_fixtures::{
        sample, BANK, CASH_AUTO, CASH_PARENT, CASH_PLAIN, EXPENSES, FOOD, SHOP, TOTALS, WALLET,
    };
    use crate::validation::ValidationFailure;

    const TC: ItemType = ItemType::TransactionCategory;

    fn session() -> (DataSet, EditSet) {
        let data = sample();
        let edits = data.derive_edit_set().unwrap();
        (data, edits)
    }

    fn set_wallet_category(edits: &mut EditSet, category: ItemId) {
        let link = FieldValue::link(ItemType::CashCategory, category);
        edits
            .set_value(ItemType::Cash, WALLET, FieldId::Category, Some(link))
            .unwrap();
    }

    #[test]
    fn edits_stay_inside_the_session() {
        let (data, mut edits) = session();

        let wallet = edits.item(ItemType::Cash, WALLET).unwrap();
        assert_eq!(wallet.style(), ListStyle::Edit);
        assert_eq!(
            wallet.link(FieldId::Category).unwrap().resolved_style(),
            Some(ListStyle::Edit)
        );

        let renamed = Some(FieldValue::text("Expenses:Groceries"));
        assert!(edits.set_value(TC, FOOD, FieldId::Name, renamed).unwrap());
        assert_eq!(edits.item(TC, FOOD).unwrap().name(), Some("Expenses:Groceries"));
        assert_eq!(data.item(TC, FOOD).unwrap().name(), Some("Expenses:Food"));
        assert_eq!(
            data.item(ItemType::Cash, WALLET)
                .unwrap()
                .link(FieldId::Category)
                .unwrap()
                .resolved_style(),
            Some(ListStyle::Core)
        );
        assert_eq!(edits.touched().collect::<Vec<_>>(), vec![(TC, FOOD)]);
    }

    #[test]
    fn unchanged_value_is_not_an_edit() {
        let (_data, mut edits) = session();
        let same = Some(FieldValue::text("Expenses:Food"));
        assert!(!edits.set_value(TC, FOOD, FieldId::Name, same).unwrap());
        assert_eq!(edits.touched().count(), 0);
        assert_eq!(edits.item(TC, FOOD).unwrap().version(), 0);
    }

    #[test]
    fn second_singular_category_flags_both() {
        let (_data, mut edits) = session();
        let second = edits
            .add_new_item(
                TC,
                vec![
                    (FieldId::Name, FieldValue::text("Everything")),
                    (FieldId::CategoryType, FieldValue::Integer(40)),
                ],
            )
            .unwrap();
        edits.validate();

        let multiple = ValidationFailure::MultipleInstances;
        assert!(edits
            .item(TC, TOTALS)
            .unwrap()
            .errors()
            .contains(FieldId::CategoryType, &multiple));
        assert!(edits
            .item(TC, second)
            .unwrap()
            .errors()
            .contains(FieldId::CategoryType, &multiple));
        assert!(edits.has_errors());

        edits.delete_item(TC, second).unwrap();
        edits.validate();
        assert!(!edits.item(TC, TOTALS).unwrap().has_errors());
        assert!(!edits.has_errors());
    }

    #[test]
    fn child_name_must_carry_parent_prefix() {
        let (_data, mut edits) = session();
        edits
            .set_value(TC, FOOD, FieldId::Name, Some(FieldValue::text("Food")))
            .unwrap();
        let errors = edits.item(TC, FOOD).unwrap().errors();
        assert!(errors.contains(FieldId::Name, &ValidationFailure::NameMismatch));
        assert!(edits.has_errors());
    }

    #[test]
    fn auto_expense_category_requires_auto_attributes() {
        let (_data, mut edits) = session();
        set_wallet_category(&mut edits, CASH_AUTO);

        let view = edits.info_view(ItemType::Cash, WALLET).unwrap();
        assert_eq!(view.is_class_required(InfoClass::AutoPayee), Requirement::MustExist);
        assert_eq!(view.is_class_required(InfoClass::AutoExpense), Requirement::MustExist);
        assert_eq!(view.is_class_required(InfoClass::SortCode), Requirement::NotAllowed);

        let errors = edits.item(ItemType::Cash, WALLET).unwrap().errors();
        assert!(errors.contains(FieldId::AutoPayee, &ValidationFailure::Missing));
        assert!(errors.contains(FieldId::AutoExpense, &ValidationFailure::Missing));

        let expense = FieldValue::link(TC, FOOD);
        let payee = FieldValue::link(ItemType::Payee, BANK);
        edits
            .set_info_value(ItemType::Cash, WALLET, InfoClass::AutoExpense, Some(expense))
            .unwrap();
        edits
            .set_info_value(ItemType::Cash, WALLET, InfoClass::AutoPayee, Some(payee))
            .unwrap();

        let wallet = edits.item(ItemType::Cash, WALLET).unwrap();
        assert!(!wallet.errors().has_field_errors(FieldId::AutoPayee));
        assert!(!wallet.errors().has_field_errors(FieldId::AutoExpense));
        assert!(!edits.has_errors());
    }

    #[test]
    fn auto_correct_follows_the_category() {
        let (_data, mut edits) = session();
        set_wallet_category(&mut edits, CASH_AUTO);
        edits.auto_correct(ItemType::Cash, WALLET).unwrap();

        let view = edits.info_view(ItemType::Cash, WALLET).unwrap();
        assert_eq!(view.auto_expense().map(Entity::id), Some(FOOD));
        assert_eq!(view.auto_payee().map(Entity::id), Some(BANK));
        assert!(!edits.item(ItemType::Cash, WALLET).unwrap().has_errors());

        set_wallet_category(&mut edits, CASH_PLAIN);
        assert!(edits
            .item(ItemType::Cash, WALLET)
            .unwrap()
            .errors()
            .contains(FieldId::AutoPayee, &ValidationFailure::NotAllowed));

        edits.auto_correct(ItemType::Cash, WALLET).unwrap();
        let view = edits.info_view(ItemType::Cash, WALLET).unwrap();
        assert!(view.auto_payee().is_none());
        assert!(view.auto_expense().is_none());
        assert_eq!(view.notes(), Some("kept in drawer"));
        assert!(!edits.has_errors());
    }

    #[test]
    fn attribute_fields_route_to_records() {
        let (_data, mut edits) = session();
        let note = Some(FieldValue::text("under the bed"));
        assert!(edits
            .set_value(ItemType::Cash, WALLET, FieldId::Notes, note)
            .unwrap());
        let view = edits.info_view(ItemType::Cash, WALLET).unwrap();
        assert_eq!(view.notes(), Some("under the bed"));

        edits
            .set_value(ItemType::Cash, WALLET, FieldId::Notes, None)
            .unwrap();
        let view = edits.info_view(ItemType::Cash, WALLET).unwrap();
        assert!(view.notes().is_none());
        assert!(edits.item(ItemType::CashInfo, ItemId::new(1)).unwrap().is_deleted());
    }

    #[test]
    fn records_are_not_edited_directly() {
        let (_data, mut edits) = session();
        let err = edits
            .set_value(
                ItemType::CashInfo,
                ItemId::new(1),
                FieldId::Value,
                Some(FieldValue::text("moved")),
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidOperation { .. }));

        let err = edits.add_new_item(ItemType::CashInfo, Vec::new()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidOperation { .. }));
    }

    #[test]
    fn referenced_items_cannot_be_deleted() {
        let (_data, mut edits) = session();
        let err = edits
            .delete_item(ItemType::CashCategory, CASH_PLAIN)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidOperation { .. }));
        let err = edits
            .delete_item(ItemType::CashCategory, CASH_PARENT)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidOperation { .. }));

        edits.delete_item(ItemType::Cash, WALLET).unwrap();
        assert!(edits.item(ItemType::CashInfo, ItemId::new(1)).unwrap().is_deleted());
        edits.delete_item(ItemType::CashCategory, CASH_PLAIN).unwrap();
        assert!(edits
            .touched()
            .any(|entry| entry == (ItemType::CashInfo, ItemId::new(1))));
    }

    #[test]
    fn failed_add_leaves_no_item() {
        let (_data, mut edits) = session();
        let before = edits.lists().list(ItemType::Cash).unwrap().total_len();

        let err = edits
            .add_new_item(
                ItemType::Cash,
                vec![
                    (FieldId::Name, FieldValue::text("Purse")),
                    (
                        FieldId::Category,
                        FieldValue::link(ItemType::CashCategory, ItemId::new(99)),
                    ),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::UnresolvedLink { .. }));

        let err = edits
            .add_new_item(
                ItemType::Cash,
                vec![(FieldId::Closed, FieldValue::Integer(1))],
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::MalformedValues { .. }));

        assert_eq!(edits.lists().list(ItemType::Cash).unwrap().total_len(), before);
        assert_eq!(edits.touched().count(), 0);
    }

    #[test]
    fn edit_with_broken_link_is_rolled_back() {
        let (_data, mut edits) = session();
        let missing = FieldValue::link(ItemType::CashCategory, ItemId::new(99));
        let err = edits
            .edit_item(ItemType::Cash, WALLET, |item| {
                item.set_unchecked(FieldId::Category, Some(missing));
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::UnresolvedLink { .. }));

        let wallet = edits.item(ItemType::Cash, WALLET).unwrap();
        assert_eq!(wallet.link(FieldId::Category).unwrap().id, CASH_PLAIN);
        assert_eq!(wallet.version(), 0);
        assert_eq!(edits.touched().count(), 0);
    }

    #[test]
    fn new_category_takes_defaults_from_parent() {
        let (_data, mut edits) = session();
        let id = edits.add_new_category(TC, Some(EXPENSES)).unwrap();
        let item = edits.item(TC, id).unwrap();
        assert_eq!(item.name(), Some("Expenses:NewCategory"));
        assert_eq!(
            edits.class_of(item),
            Some(CategoryClass::Transaction(TransactionClass::Expense))
        );
        assert!(item.is_new());
        assert!(!item.has_errors());

        let next = edits.add_new_category(TC, Some(EXPENSES)).unwrap();
        assert_eq!(edits.item(TC, next).unwrap().name(), Some("Expenses:NewCategory1"));
    }

    #[test]
    fn category_defaults_move_a_category() {
        let (_data, mut edits) = session();
        let defaults = edits.set_category_defaults(TC, FOOD, Some(TOTALS)).unwrap();
        assert_eq!(defaults.category_type, 31);
        let food = edits.item(TC, FOOD).unwrap();
        assert_eq!(food.name(), Some("Totals:NewCategory"));
        assert_eq!(food.link(FieldId::Parent).unwrap().id, TOTALS);
        // A second expense totals category.
        assert!(food
            .errors()
            .contains(FieldId::CategoryType, &ValidationFailure::MultipleInstances));
    }

    #[test]
    fn abandoned_session_refuses_edits() {
        let (_data, mut edits) = session();
        edits.abandon().unwrap();
        assert_eq!(edits.state(), SessionState::Abandoned);

        let err = edits
            .set_value(ItemType::Payee, SHOP, FieldId::Name, Some(FieldValue::text("Shop")))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidOperation { .. }));
        assert!(edits.delete_item(ItemType::Payee, SHOP).is_err());
        assert!(edits.abandon().is_err());
    }
}
