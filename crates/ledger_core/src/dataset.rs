//! The top-level container of core lists.

use crate::config::Config;
use crate::crypto::{FieldCipher, PlainCipher};
use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::info::InfoView;
use crate::list::{EntityList, ListMap};
use crate::resolve::Resolver;
use crate::session::EditSet;
use crate::static_data::StaticData;
use crate::types::{ItemId, ItemType, ListStyle};
use crate::value::ValuesIn;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Counts of what a commit did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Items inserted into the core lists.
    pub added: usize,
    /// Core items whose values changed.
    pub changed: usize,
    /// Core items marked deleted.
    pub deleted: usize,
}

impl CommitSummary {
    /// Returns true if the commit changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.changed == 0 && self.deleted == 0
    }
}

/// One list per item type plus everything needed to resolve, validate and
/// edit them.
///
/// A core data set is loaded row by row with
/// [`add_values_item`](Self::add_values_item), then
/// [`resolve_data_set_links`](Self::resolve_data_set_links) links the rows
/// together. Edits happen in an [`EditSet`] derived from it and come back
/// through [`commit`](Self::commit).
#[derive(Debug, Clone)]
pub struct DataSet {
    lists: ListMap,
}

impl DataSet {
    /// Creates an empty core data set with the identity cipher.
    #[must_use]
    pub fn new(config: Config, statics: StaticData) -> Self {
        Self::with_shared(Arc::new(config), Arc::new(statics))
    }

    /// Creates an empty core data set from shared configuration.
    #[must_use]
    pub fn with_shared(config: Arc<Config>, statics: Arc<StaticData>) -> Self {
        Self {
            lists: ListMap::with_all_lists(ListStyle::Core, config, statics, Arc::new(PlainCipher)),
        }
    }

    /// Replaces the field cipher. Must be set before rows are loaded.
    #[must_use]
    pub fn with_cipher(mut self, cipher: Arc<dyn FieldCipher>) -> Self {
        self.lists.set_cipher(cipher);
        self
    }

    fn from_lists(lists: ListMap) -> Self {
        Self { lists }
    }

    /// The lists of the data set.
    #[must_use]
    pub fn lists(&self) -> &ListMap {
        &self.lists
    }

    /// Shared configuration.
    #[must_use]
    pub fn shared_config(&self) -> &Arc<Config> {
        self.lists.shared_config()
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

    /// Loads one row into the list of its type and returns the item id.
    ///
    /// Links stay unresolved until
    /// [`resolve_data_set_links`](Self::resolve_data_set_links).
    ///
    /// # Errors
    ///
    /// As [`EntityList::add_values_item`].
    pub fn add_values_item(&mut self, item_type: ItemType, values: &ValuesIn) -> CoreResult<ItemId> {
        let cipher = Arc::clone(self.lists.cipher());
        let item = self
            .lists
            .list_mut(item_type)?
            .add_values_item(values, cipher.as_ref())?;
        Ok(item.id())
    }

    /// Loads a batch of rows of one type. Returns the number loaded.
    ///
    /// # Errors
    ///
    /// Stops at the first row that fails; earlier rows stay loaded.
    pub fn load_rows(&mut self, item_type: ItemType, rows: &[ValuesIn]) -> CoreResult<usize> {
        for values in rows {
            self.add_values_item(item_type, values)?;
        }
        debug!(%item_type, rows = rows.len(), "loaded rows");
        Ok(rows.len())
    }

    /// Resolves every link against the core lists and rebuilds the
    /// attribute sets of all owners.
    ///
    /// # Errors
    ///
    /// Fails on the first link whose target is missing or deleted, or on an
    /// owner with two records of one attribute class.
    pub fn resolve_data_set_links(&mut self) -> CoreResult<()> {
        if let Err(err) = self.lists.resolve_all_links() {
            warn!(error = %err, "data set links do not resolve");
            return Err(err);
        }
        self.lists.rebuild_attribute_sets()
    }

    /// Validates every item, storing the errors on the items. Returns the
    /// number of items with errors.
    pub fn validate_all(&mut self) -> usize {
        self.lists.validate_all()
    }

    /// Items whose last validation recorded errors.
    pub fn items_with_errors(&self) -> impl Iterator<Item = &Entity> {
        self.lists.items_with_errors()
    }

    /// Rebuilds the uniqueness index of every list.
    pub fn update_maps(&mut self) {
        self.lists.update_maps();
    }

    /// Derives an edit session over every list.
    ///
    /// # Errors
    ///
    /// Fails if the data set is not a core set or a list does not resolve.
    pub fn derive_edit_set(&self) -> CoreResult<EditSet> {
        self.ensure_core("derive an edit set")?;
        let mut edits = EditSet::new(self.lists.empty_like(ListStyle::Edit));
        for list in self.lists.lists() {
            edits.derive_list(list)?;
        }
        info!(lists = edits.lists().lists().count(), "derived edit set");
        Ok(edits)
    }

    fn ensure_core(&self, action: &str) -> CoreResult<()> {
        if self.lists.style() == ListStyle::Core {
            Ok(())
        } else {
            Err(CoreError::invalid_operation(format!(
                "cannot {action} from a {} data set",
                self.lists.style()
            )))
        }
    }

    /// Commits an edit session into the core lists.
    ///
    /// Every touched item is validated first and any error blocks the
    /// commit. Then, in dependency order, new items are inserted, deleted
    /// items are deleted and every other item applies its changes to its
    /// core counterpart. The changes are made on a staged copy of the core
    /// lists that replaces them only once its links resolve, so nothing is
    /// changed unless every check passes.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` if the session is not active, `ValidationFailed`
    /// if a touched item has errors, `MissingCounterpart` if an edited item
    /// has no live core item, `DuplicateId` if a new item's id was taken in
    /// the meantime, `UnresolvedLink` if the result would link to an item
    /// that no longer exists.
    pub fn commit(&mut self, edits: &mut EditSet) -> CoreResult<CommitSummary> {
        self.ensure_core("commit")?;
        edits.ensure_active()?;

        edits.validate();
        let failing = edits.touched_with_errors();
        if failing > 0 {
            warn!(failing, "commit blocked by validation errors");
            return Err(CoreError::ValidationFailed { count: failing });
        }

        for list in edits.lists().lists() {
            for item in list.iter_all() {
                let core = self.item(item.item_type(), item.id());
                match (item.is_new(), core) {
                    (true, Some(_)) if !item.is_deleted() => {
                        return Err(CoreError::duplicate_id(item.item_type(), item.id()));
                    }
                    (false, None) => {
                        return Err(CoreError::missing_counterpart(item.item_type(), item.id()));
                    }
                    (false, Some(core)) if core.is_deleted() => {
                        return Err(CoreError::missing_counterpart(item.item_type(), item.id()));
                    }
                    _ => {}
                }
            }
        }

        let mut staged = self.lists.clone();
        let mut summary = CommitSummary::default();
        for edit_list in edits.lists().lists() {
            let core_list = staged.list_mut(edit_list.item_type())?;
            for item in edit_list.iter_all() {
                match (item.is_new(), item.is_deleted()) {
                    (true, true) => {}
                    (true, false) => {
                        let mut copy = item.copy(ListStyle::Core);
                        copy.set_new(true);
                        core_list.insert_entity(copy)?;
                        summary.added += 1;
                    }
                    (false, true) => {
                        core_list.delete_item(item.id())?;
                        summary.deleted += 1;
                    }
                    (false, false) => {
                        if core_list.edit_item(item.id(), |core| core.apply_changes(item))? {
                            summary.changed += 1;
                        }
                    }
                }
            }
        }

        if let Err(err) = staged.resolve_all_links() {
            warn!(%err, "commit leaves a broken link");
            return Err(err);
        }
        staged.rebuild_attribute_sets()?;
        staged.update_maps();
        self.lists = staged;
        edits.mark_committed();
        info!(
            added = summary.added,
            changed = summary.changed,
            deleted = summary.deleted,
            "committed edit set"
        );
        Ok(summary)
    }

    /// Copies the items that need saving (new, changed or deleted) into an
    /// update-style data set.
    ///
    /// Items keep their state, so a changed item still reports its original
    /// values. Links are left unresolved since their targets may not be
    /// part of the update.
    ///
    /// # Errors
    ///
    /// Fails only if the source lists break id uniqueness.
    pub fn derive_update_set(&self) -> CoreResult<DataSet> {
        let mut lists = self.lists.empty_like(ListStyle::Update);
        for list in self.lists.lists() {
            let mut update = list.empty_like(ListStyle::Update);
            for item in list.iter_all().filter(|item| item.state().needs_save()) {
                update.insert_entity(item.copy_with_state(ListStyle::Update))?;
            }
            lists.insert_list(update)?;
        }
        Ok(DataSet::from_lists(lists))
    }

    /// Deep copy of the data set, resolved against itself.
    ///
    /// # Errors
    ///
    /// Fails if the copy does not resolve.
    pub fn derive_clone_set(&self) -> CoreResult<DataSet> {
        let mut lists = self.lists.empty_like(ListStyle::Clone);
        for list in self.lists.lists() {
            lists.insert_list(list.derive_clone_list())?;
        }
        lists.resolve_all_links()?;
        lists.rebuild_attribute_sets()?;
        Ok(DataSet::from_lists(lists))
    }

    /// Structural difference between `old` and this data set.
    ///
    /// Items live only here are flagged new, items live only in `old` come
    /// back deleted, and items live in both with differing values carry the
    /// old values as their original and this set's values as live values.
    /// Unchanged items are left out.
    ///
    /// # Errors
    ///
    /// Fails only if either set breaks id uniqueness.
    pub fn derive_difference_set(&self, old: &DataSet) -> CoreResult<DataSet> {
        let mut lists = self.lists.empty_like(ListStyle::Difference);
        for list in self.lists.lists() {
            let item_type = list.item_type();
            let mut diff = list.empty_like(ListStyle::Difference);

            for item in list.iter() {
                let entry = match old.lookup(item_type, item.id()) {
                    None => {
                        let mut copy = item.copy(ListStyle::Difference);
                        copy.set_new(true);
                        Some(copy)
                    }
                    Some(previous) => {
                        let mut copy = previous.copy(ListStyle::Difference);
                        copy.apply_changes(item).then_some(copy)
                    }
                };
                if let Some(entry) = entry {
                    diff.insert_entity(entry)?;
                }
            }

            if let Some(old_list) = old.list(item_type) {
                for previous in old_list.iter() {
                    if self.lookup(item_type, previous.id()).is_none() {
                        let mut copy = previous.copy(ListStyle::Difference);
                        copy.set_deleted(true);
                        diff.insert_entity(copy)?;
                    }
                }
            }
            lists.insert_list(diff)?;
        }
        Ok(DataSet::from_lists(lists))
    }

    /// Marks everything as saved: deleted items are purged, history and new
    /// flags are cleared.
    pub fn mark_saved(&mut self) {
        let types: Vec<ItemType> = self.lists.lists().map(EntityList::item_type).collect();
        let mut purged = 0;
        for item_type in types {
            if let Ok(list) = self.lists.list_mut(item_type) {
                purged += list.purge_deleted();
                for item in list.items_mut() {
                    item.clear_history();
                    item.set_new(false);
                }
            }
        }
        self.lists.update_maps();
        debug!(purged, "marked data set saved");
    }
}

impl Resolver for DataSet {
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
