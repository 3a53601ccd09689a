//! Field values and their storage.
//!
//! An item's fields live in a [`ValueBag`], an ordered map from
//! [`FieldId`] to [`FieldValue`]. Loaders hand rows to the core as
//! [`ValuesIn`]; [`Entity::values_out`](crate::Entity::values_out) produces
//! the same shape back.

mod bag;
mod field;

pub use bag::ValueBag;
pub use field::{FieldId, FieldKind, FieldSpec, TextLimit};

use crate::types::{Currency, ItemId, ItemType, ListStyle, Money};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A typed field value.
///
/// Equality is value equality: sealed values compare by plaintext and links
/// compare by target only, regardless of which list they resolved against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer.
    Integer(i64),
    /// Text.
    Text(String),
    /// Money amount.
    Money(Money),
    /// Calendar date.
    Date(NaiveDate),
    /// Currency code.
    Currency(Currency),
    /// Reference to another item.
    Link(Link),
    /// A value held together with its sealed form.
    Encrypted(EncryptedValue),
}

impl FieldValue {
    /// Creates a text value.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates an unresolved link value.
    #[must_use]
    pub fn link(item_type: ItemType, id: ItemId) -> Self {
        Self::Link(Link::new(item_type, id))
    }

    /// Returns the plaintext value, looking through a sealed pair.
    #[must_use]
    pub fn plain(&self) -> &FieldValue {
        match self {
            Self::Encrypted(sealed) => sealed.plain(),
            other => other,
        }
    }

    /// Returns the value as a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.plain() {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an integer.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self.plain() {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self.plain() {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as money.
    #[must_use]
    pub fn as_money(&self) -> Option<&Money> {
        match self.plain() {
            Self::Money(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the value as a date.
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self.plain() {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the value as a currency.
    #[must_use]
    pub fn as_currency(&self) -> Option<&Currency> {
        match self.plain() {
            Self::Currency(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the value as a link.
    #[must_use]
    pub fn as_link(&self) -> Option<&Link> {
        match self.plain() {
            Self::Link(link) => Some(link),
            _ => None,
        }
    }

    /// Returns true if the plaintext matches the declared kind.
    #[must_use]
    pub fn matches_kind(&self, kind: FieldKind) -> bool {
        match (kind, self.plain()) {
            (FieldKind::Bool, Self::Bool(_)) => true,
            (FieldKind::Integer | FieldKind::StaticRef | FieldKind::InfoClass, Self::Integer(_)) => {
                true
            }
            (FieldKind::Text(_), Self::Text(_)) => true,
            (FieldKind::Money, Self::Money(_)) => true,
            (FieldKind::Date, Self::Date(_)) => true,
            (FieldKind::Currency, Self::Currency(_)) => true,
            (FieldKind::Link(target), Self::Link(link)) => link.item_type == target,
            _ => false,
        }
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Text(_) => "text",
            Self::Money(_) => "money",
            Self::Date(_) => "date",
            Self::Currency(_) => "currency",
            Self::Link(_) => "link",
            Self::Encrypted(_) => "encrypted",
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self.plain(), other.plain()) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Money(a), Self::Money(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Currency(a), Self::Currency(b)) => a == b,
            (Self::Link(a), Self::Link(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for FieldValue {}

/// Reference from one item to another.
///
/// A link starts unresolved. Resolution checks the target against one
/// resolver and records that resolver's list style, so a link is never
/// resolved against a core list and an edit list at the same time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    /// Type of the target.
    pub item_type: ItemType,
    /// Id of the target.
    pub id: ItemId,
    #[serde(skip)]
    resolved: Option<ListStyle>,
}

impl Link {
    /// Creates an unresolved link.
    #[must_use]
    pub const fn new(item_type: ItemType, id: ItemId) -> Self {
        Self {
            item_type,
            id,
            resolved: None,
        }
    }

    /// Returns the style of the list the link was resolved against.
    #[must_use]
    pub fn resolved_style(&self) -> Option<ListStyle> {
        self.resolved
    }

    /// Returns true once the link has been resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    pub(crate) fn mark_resolved(&mut self, style: ListStyle) {
        self.resolved = Some(style);
    }

    pub(crate) fn clear_resolution(&mut self) {
        self.resolved = None;
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.item_type == other.item_type && self.id == other.id
    }
}

impl Eq for Link {}

/// Plaintext value held alongside its sealed bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedValue {
    plain: Box<FieldValue>,
    sealed: Vec<u8>,
}

impl EncryptedValue {
    pub(crate) fn new(plain: FieldValue, sealed: Vec<u8>) -> Self {
        Self {
            plain: Box::new(plain),
            sealed,
        }
    }

    /// Returns the plaintext value.
    #[must_use]
    pub fn plain(&self) -> &FieldValue {
        &self.plain
    }

    /// Returns the sealed bytes.
    #[must_use]
    pub fn sealed(&self) -> &[u8] {
        &self.sealed
    }
}

/// A raw value as delivered by a loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Plaintext value; sealed on construction if the field is encrypted.
    Plain(FieldValue),
    /// Sealed bytes; opened on construction.
    Sealed(Vec<u8>),
}

/// Ordered field/value pairs for one row, consumed by values constructors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuesIn {
    /// Id of the row; a fresh id is allocated when absent.
    #[serde(default)]
    pub id: Option<ItemId>,
    /// Field values in loader order.
    #[serde(default)]
    pub fields: Vec<(FieldId, RawValue)>,
}

impl ValuesIn {
    /// Creates an empty row with the given id.
    #[must_use]
    pub fn new(id: ItemId) -> Self {
        Self {
            id: Some(id),
            fields: Vec::new(),
        }
    }

    /// Creates an empty row that will be given a fresh id.
    #[must_use]
    pub fn unnumbered() -> Self {
        Self::default()
    }

    /// Appends a plaintext value.
    #[must_use]
    pub fn with(mut self, field: FieldId, value: FieldValue) -> Self {
        self.fields.push((field, RawValue::Plain(value)));
        self
    }

    /// Appends sealed bytes.
    #[must_use]
    pub fn with_sealed(mut self, field: FieldId, sealed: Vec<u8>) -> Self {
        self.fields.push((field, RawValue::Sealed(sealed)));
        self
    }

    /// Returns the raw value of a field.
    #[must_use]
    pub fn get(&self, field: FieldId) -> Option<&RawValue> {
        self.fields
            .iter()
            .find(|(id, _)| *id == field)
            .map(|(_, value)| value)
    }
}
