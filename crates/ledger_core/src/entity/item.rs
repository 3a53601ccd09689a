//! The versioned item.

use crate::crypto::{open, seal, FieldCipher};
use crate::entity::ItemState;
use crate::error::{CoreError, CoreResult};
use crate::history::HistoryTracker;
use crate::info::{AttributeSet, InfoClass};
use crate::resolve::Resolver;
use crate::types::{Currency, ItemId, ItemType, ListStyle};
use crate::validation::ValidationErrors;
use crate::value::{FieldId, FieldKind, FieldValue, Link, RawValue, ValueBag, ValuesIn};

/// A versioned item of one concrete type.
///
/// The item knows its id, type and the style of the list holding it, but
/// never holds a reference to that list. Its values live in a
/// [`HistoryTracker`]; owners of attribute records carry an
/// [`AttributeSet`] mapping each attribute class to a record id.
#[derive(Debug, Clone)]
pub struct Entity {
    id: ItemId,
    item_type: ItemType,
    style: ListStyle,
    deleted: bool,
    new: bool,
    history: HistoryTracker,
    attributes: Option<AttributeSet>,
    errors: ValidationErrors,
}

impl Entity {
    fn with_values(item_type: ItemType, style: ListStyle, id: ItemId, values: ValueBag) -> Self {
        Self {
            id,
            item_type,
            style,
            deleted: false,
            new: false,
            history: HistoryTracker::new(values),
            attributes: item_type.info_type().map(|_| AttributeSet::new()),
            errors: ValidationErrors::new(),
        }
    }

    /// Builds an item from loader values.
    ///
    /// Every field must be declared by the item type and hold a value of the
    /// declared kind. Plain values of encrypted fields are sealed; sealed
    /// bytes are opened so the plaintext is available for comparison.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` for undeclared fields and `MalformedValues`
    /// for duplicated fields, wrong kinds or sealed bytes on a plain field.
    pub fn from_values(
        item_type: ItemType,
        style: ListStyle,
        id: ItemId,
        values: &ValuesIn,
        cipher: &dyn FieldCipher,
    ) -> CoreResult<Self> {
        let info_class = match item_type.info_owner() {
            Some(_) => Some(info_class_of(item_type, values)?),
            None => None,
        };

        let mut bag = ValueBag::new();
        for (field, raw) in &values.fields {
            if bag.contains(*field) {
                return Err(CoreError::malformed_values(
                    item_type,
                    format!("field {field} supplied twice"),
                ));
            }
            let slot = FieldSlot::lookup(item_type, *field, info_class)?;
            let value = match raw {
                RawValue::Plain(value) => {
                    let plain = value.plain().clone();
                    slot.check_kind(item_type, &plain)?;
                    if slot.encrypted {
                        seal(cipher, slot.cipher_field, plain)?
                    } else {
                        plain
                    }
                }
                RawValue::Sealed(bytes) => {
                    if !slot.encrypted {
                        return Err(CoreError::malformed_values(
                            item_type,
                            format!("field {field} is not sealed"),
                        ));
                    }
                    let opened = open(cipher, slot.cipher_field, bytes)?;
                    slot.check_kind(item_type, &opened)?;
                    opened
                }
            };
            bag.set(*field, Some(without_resolution(value)));
        }

        Ok(Self::with_values(item_type, style, id, bag))
    }

    /// Creates an empty item flagged as new.
    #[must_use]
    pub fn new_item(item_type: ItemType, style: ListStyle, id: ItemId) -> Self {
        let mut item = Self::with_values(item_type, style, id, ValueBag::new());
        item.new = true;
        item
    }

    /// Copies the item into a list of another style.
    ///
    /// The copy keeps the id and values but starts with no history, no
    /// flags, an empty attribute set and unresolved links.
    #[must_use]
    pub fn copy(&self, style: ListStyle) -> Self {
        let mut values = self.values().clone();
        for (_, link) in values.links_mut() {
            link.clear_resolution();
        }
        Self::with_values(self.item_type, style, self.id, values)
    }

    /// Copies the item keeping its flags and its original values, so the
    /// copy reports the same [`ItemState`].
    #[must_use]
    pub fn copy_with_state(&self, style: ListStyle) -> Self {
        let mut copy = self.copy(style);
        copy.deleted = self.deleted;
        copy.new = self.new;
        if self.history.is_changed() {
            let mut original = self.history.original().clone();
            for (_, link) in original.links_mut() {
                link.clear_resolution();
            }
            copy.history.set_original(original);
        }
        copy
    }

    /// Returns the item id.
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Returns the item type.
    #[must_use]
    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// Returns the style of the list holding the item.
    #[must_use]
    pub fn style(&self) -> ListStyle {
        self.style
    }

    /// Returns true if the item is deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Returns true if the item was added since the last save.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.new
    }

    pub(crate) fn set_deleted(&mut self, deleted: bool) {
        self.deleted = deleted;
    }

    pub(crate) fn set_new(&mut self, new: bool) {
        self.new = new;
    }

    /// Returns the live values.
    #[must_use]
    pub fn values(&self) -> &ValueBag {
        self.history.values()
    }

    /// Returns the live value of a field.
    #[must_use]
    pub fn value(&self, field: FieldId) -> Option<&FieldValue> {
        self.values().get(field)
    }

    /// Returns the value a field had before the first recorded change.
    #[must_use]
    pub fn original_value(&self, field: FieldId) -> Option<&FieldValue> {
        self.history.original().get(field)
    }

    /// Returns the item name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.values().text(FieldId::Name)
    }

    /// Returns a link field.
    #[must_use]
    pub fn link(&self, field: FieldId) -> Option<&Link> {
        self.values().link(field)
    }

    /// Returns true if the item carries a set closed flag.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.values().flag(FieldId::Closed).unwrap_or(false)
    }

    /// Returns the currency of an account.
    #[must_use]
    pub fn currency(&self) -> Option<&Currency> {
        self.value(FieldId::Currency).and_then(FieldValue::as_currency)
    }

    /// Returns the static type row id of a category.
    #[must_use]
    pub fn category_type(&self) -> Option<u32> {
        self.values()
            .integer(FieldId::CategoryType)
            .and_then(|id| u32::try_from(id).ok())
    }

    /// Returns the attribute class of an attribute record.
    #[must_use]
    pub fn info_class(&self) -> Option<InfoClass> {
        self.values()
            .integer(FieldId::InfoClass)
            .and_then(|id| u32::try_from(id).ok())
            .and_then(|id| InfoClass::from_id(id).ok())
    }

    /// Returns the history tracker.
    #[must_use]
    pub fn history(&self) -> &HistoryTracker {
        &self.history
    }

    /// Snapshots the live values.
    pub fn push_history(&mut self) {
        self.history.push_history();
    }

    /// Keeps the last snapshot if the values changed since it was taken.
    pub fn check_for_history(&mut self) -> bool {
        self.history.check_for_history()
    }

    /// Restores the last snapshot.
    pub fn pop_history(&mut self) {
        self.history.pop_history();
    }

    /// Restores the values held at an earlier version.
    pub fn rewind_to(&mut self, version: usize) {
        self.history.rewind_to(version);
    }

    /// Number of snapshots held.
    #[must_use]
    pub fn version(&self) -> usize {
        self.history.version()
    }

    /// Fields that differ from the original values.
    #[must_use]
    pub fn changed_fields(&self) -> Vec<FieldId> {
        self.history.changed_fields()
    }

    pub(crate) fn clear_history(&mut self) {
        self.history.clear_history();
    }

    /// Returns the persistence state of the item.
    #[must_use]
    pub fn state(&self) -> ItemState {
        match (self.deleted, self.new) {
            (true, true) => ItemState::DeletedNew,
            (true, false) => ItemState::Deleted,
            (false, true) => ItemState::New,
            (false, false) if self.history.is_changed() => ItemState::Changed,
            (false, false) => ItemState::Clean,
        }
    }

    /// Returns the attribute set of an owner item.
    #[must_use]
    pub fn attributes(&self) -> Option<&AttributeSet> {
        self.attributes.as_ref()
    }

    pub(crate) fn attributes_mut(&mut self) -> Option<&mut AttributeSet> {
        self.attributes.as_mut()
    }

    /// Returns the errors recorded by the last validation.
    #[must_use]
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Returns true if the last validation recorded errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors.has_errors()
    }

    pub(crate) fn set_errors(&mut self, errors: ValidationErrors) {
        self.errors = errors;
    }

    /// Sets a field without any checks.
    ///
    /// Links are stored unresolved.
    pub fn set_unchecked(&mut self, field: FieldId, value: Option<FieldValue>) {
        self.history
            .values_mut()
            .set(field, value.map(without_resolution));
    }

    /// Sets a field after checking it against the field table, sealing it
    /// if the field is encrypted.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` if the type does not declare the field and
    /// `MalformedValues` if the value has the wrong kind.
    pub fn set_value(
        &mut self,
        field: FieldId,
        value: Option<FieldValue>,
        cipher: &dyn FieldCipher,
    ) -> CoreResult<()> {
        let slot = FieldSlot::lookup(self.item_type, field, self.info_class())?;
        let value = match value {
            Some(value) => {
                let plain = value.plain().clone();
                slot.check_kind(self.item_type, &plain)?;
                Some(if slot.encrypted {
                    seal(cipher, slot.cipher_field, plain)?
                } else {
                    plain
                })
            }
            None => None,
        };
        self.set_unchecked(field, value);
        Ok(())
    }

    /// Copies every editable field that differs from `source`.
    ///
    /// Returns false without touching the item if `source` is of another
    /// type. Otherwise the copy is bracketed by a history push/check and the
    /// result of the check is returned.
    pub fn apply_changes(&mut self, source: &Entity) -> bool {
        if source.item_type != self.item_type {
            return false;
        }

        self.history.push_history();
        for spec in self.item_type.fields().iter().filter(|spec| spec.editable) {
            let theirs = source.value(spec.id);
            if self.value(spec.id) != theirs {
                self.set_unchecked(spec.id, theirs.cloned());
            }
        }
        self.history.check_for_history()
    }

    /// Produces the loader representation of the item.
    ///
    /// Encrypted fields are emitted as their sealed bytes, so feeding the
    /// result back through [`from_values`](Self::from_values) with the same
    /// cipher reproduces the values.
    #[must_use]
    pub fn values_out(&self) -> ValuesIn {
        let fields = self
            .values()
            .iter()
            .map(|(field, value)| {
                let raw = match value {
                    FieldValue::Encrypted(sealed) => RawValue::Sealed(sealed.sealed().to_vec()),
                    other => RawValue::Plain(without_resolution(other.clone())),
                };
                (field, raw)
            })
            .collect();
        ValuesIn {
            id: Some(self.id),
            fields,
        }
    }

    /// Checks that every link targets a live item in the resolver's lists.
    pub(crate) fn check_links(&self, resolver: &dyn Resolver) -> CoreResult<()> {
        for (field, link) in self.values().links() {
            if resolver.list(link.item_type).is_none() {
                return Err(CoreError::missing_list(link.item_type));
            }
            if resolver.lookup(link.item_type, link.id).is_none() {
                return Err(CoreError::UnresolvedLink {
                    item_type: self.item_type,
                    id: self.id,
                    field,
                    target_type: link.item_type,
                    target_id: link.id,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn mark_links_resolved(&mut self, style: ListStyle) {
        for (_, link) in self.history.values_mut().links_mut() {
            link.mark_resolved(style);
        }
    }

    pub(crate) fn clear_link_resolution(&mut self) {
        for (_, link) in self.history.values_mut().links_mut() {
            link.clear_resolution();
        }
    }

    /// Resolves every link against `resolver`.
    ///
    /// Resolution is all or nothing: on failure every link is left
    /// unresolved.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedLink` if a target is missing or deleted.
    pub fn resolve_links(&mut self, resolver: &dyn Resolver) -> CoreResult<()> {
        self.clear_link_resolution();
        self.check_links(resolver)?;
        self.mark_links_resolved(resolver.style());
        Ok(())
    }
}

/// A field as seen by the checked setters.
struct FieldSlot {
    kind: FieldKind,
    encrypted: bool,
    cipher_field: FieldId,
}

impl FieldSlot {
    fn lookup(item_type: ItemType, field: FieldId, info: Option<InfoClass>) -> CoreResult<Self> {
        let spec = item_type
            .field_spec(field)
            .ok_or_else(|| CoreError::unknown_field(item_type, field))?;
        match (spec.kind, info) {
            (FieldKind::InfoValue, Some(class)) => Ok(Self {
                kind: class.kind(),
                encrypted: class.encrypted(),
                cipher_field: class.field_id(),
            }),
            (FieldKind::InfoValue, None) => Err(CoreError::malformed_values(
                item_type,
                "value supplied without an info class",
            )),
            (kind, _) => Ok(Self {
                kind,
                encrypted: spec.encrypted,
                cipher_field: field,
            }),
        }
    }

    fn check_kind(&self, item_type: ItemType, value: &FieldValue) -> CoreResult<()> {
        if value.matches_kind(self.kind) {
            Ok(())
        } else {
            Err(CoreError::malformed_values(
                item_type,
                format!("expected {:?}, got {}", self.kind, value.kind_name()),
            ))
        }
    }
}

fn info_class_of(item_type: ItemType, values: &ValuesIn) -> CoreResult<InfoClass> {
    let raw = values
        .get(FieldId::InfoClass)
        .ok_or_else(|| CoreError::malformed_values(item_type, "missing info class"))?;
    let id = match raw {
        RawValue::Plain(value) => value.as_integer(),
        RawValue::Sealed(_) => None,
    }
    .ok_or_else(|| CoreError::malformed_values(item_type, "info class must be an integer"))?;
    let id = u32::try_from(id).map_err(|_| {
        CoreError::malformed_values(item_type, format!("info class {id} out of range"))
    })?;
    InfoClass::from_id(id)
}

fn without_resolution(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Link(link) => FieldValue::Link(Link::new(link.item_type, link.id)),
        other => other,
    }
}
