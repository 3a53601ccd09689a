//! Field storage of a single item.

use crate::value::{FieldId, FieldValue, Link};
use std::collections::BTreeMap;

/// Ordered mapping from field to value.
///
/// Setters here are unchecked: they never validate kinds or seal values.
/// The checked path lives on [`Entity::set_value`](crate::Entity::set_value).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueBag {
    values: BTreeMap<FieldId, FieldValue>,
}

impl ValueBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn get(&self, field: FieldId) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// Sets or clears a field without any checks.
    pub fn set(&mut self, field: FieldId, value: Option<FieldValue>) {
        match value {
            Some(value) => {
                self.values.insert(field, value);
            }
            None => {
                self.values.remove(&field);
            }
        }
    }

    /// Returns true if the field holds a value.
    #[must_use]
    pub fn contains(&self, field: FieldId) -> bool {
        self.values.contains_key(&field)
    }

    /// Iterates fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }

    /// Returns the number of fields holding a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no field holds a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns a field as text.
    #[must_use]
    pub fn text(&self, field: FieldId) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Returns a field as a boolean.
    #[must_use]
    pub fn flag(&self, field: FieldId) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_bool)
    }

    /// Returns a field as an integer.
    #[must_use]
    pub fn integer(&self, field: FieldId) -> Option<i64> {
        self.get(field).and_then(FieldValue::as_integer)
    }

    /// Returns a field as a link.
    #[must_use]
    pub fn link(&self, field: FieldId) -> Option<&Link> {
        self.get(field).and_then(FieldValue::as_link)
    }

    /// Fields whose value differs between the two bags, in key order.
    #[must_use]
    pub fn differing_fields(&self, other: &ValueBag) -> Vec<FieldId> {
        let mut fields: Vec<FieldId> = self
            .values
            .keys()
            .chain(other.values.keys())
            .copied()
            .filter(|field| self.get(*field) != other.get(*field))
            .collect();
        fields.sort();
        fields.dedup();
        fields
    }

    pub(crate) fn links_mut(&mut self) -> impl Iterator<Item = (FieldId, &mut Link)> {
        self.values
            .iter_mut()
            .filter_map(|(field, value)| match value {
                FieldValue::Link(link) => Some((*field, link)),
                _ => None,
            })
    }

    pub(crate) fn links(&self) -> impl Iterator<Item = (FieldId, &Link)> {
        self.values.iter().filter_map(|(field, value)| match value {
            FieldValue::Link(link) => Some((*field, link)),
            _ => None,
        })
    }
}
