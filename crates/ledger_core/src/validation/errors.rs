//! Accumulated validation errors.

use crate::value::FieldId;
use thiserror::Error;

/// A broken domain rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    /// A required value is absent.
    #[error("value is required")]
    Missing,

    /// A value is present where none is allowed.
    #[error("value is not allowed")]
    NotAllowed,

    /// Text exceeds its limit.
    #[error("value exceeds {max} characters")]
    TooLong {
        /// The limit in characters.
        max: usize,
    },

    /// Another live item of the list has the same name.
    #[error("name is already in use")]
    DuplicateName,

    /// A singular category class is used by more than one category.
    #[error("only one category of this type is allowed")]
    MultipleInstances,

    /// The category type row does not exist.
    #[error("unknown category type")]
    UnknownType,

    /// The category type row is disabled.
    #[error("category type is disabled")]
    DisabledType,

    /// The parent category may not parent this category.
    #[error("invalid parent category")]
    InvalidParent,

    /// The name does not start with the parent name and separator.
    #[error("name does not match parent")]
    NameMismatch,

    /// A money value is not in the account currency.
    #[error("currency does not match account")]
    CurrencyMismatch,

    /// The linked category has an unsuitable class.
    #[error("invalid category")]
    InvalidCategory,

    /// The linked item is closed.
    #[error("linked item is closed")]
    ClosedLink,
}

/// Ordered `(field, failure)` pairs of one item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(FieldId, ValidationFailure)>,
}

impl ValidationErrors {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure against a field.
    pub fn add(&mut self, field: FieldId, failure: ValidationFailure) {
        self.entries.push((field, failure));
    }

    /// Returns true if any failure is recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of failures recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the field has any failure.
    #[must_use]
    pub fn has_field_errors(&self, field: FieldId) -> bool {
        self.entries.iter().any(|(f, _)| *f == field)
    }

    /// Failures recorded against a field.
    pub fn for_field(&self, field: FieldId) -> impl Iterator<Item = &ValidationFailure> {
        self.entries
            .iter()
            .filter(move |(f, _)| *f == field)
            .map(|(_, failure)| failure)
    }

    /// Returns true if exactly this failure is recorded against the field.
    #[must_use]
    pub fn contains(&self, field: FieldId, failure: &ValidationFailure) -> bool {
        self.entries
            .iter()
            .any(|(f, recorded)| *f == field && recorded == failure)
    }

    /// Iterates all failures in recording order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &ValidationFailure)> {
        self.entries.iter().map(|(field, failure)| (*field, failure))
    }

    /// Forgets every failure.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
