//! Property-based test generators using proptest.
//!
//! Provides strategies for generating external id components, names and
//! edit sequences that stay within the ranges the core accepts.

use crate::fixtures::{payee_row, Row};
use ledger_core::{AssetType, CoreResult, Entity, FieldCipher, FieldId, FieldValue, ItemId};
use proptest::prelude::*;

/// Exclusive upper bound of an external id major component.
pub const MAJOR_LIMIT: u32 = 1 << 28;

/// Exclusive upper bound of a major component that can still be re-tagged
/// as an alternate id.
pub const ALTERNATE_MAJOR_LIMIT: u32 = 1 << 24;

/// Strategy for generating asset types.
pub fn asset_type_strategy() -> impl Strategy<Value = AssetType> {
    prop::sample::select(AssetType::ALL.to_vec())
}

/// Strategy for generating `(asset, major, base)` triples that encode.
pub fn external_id_parts_strategy() -> impl Strategy<Value = (AssetType, u32, u32)> {
    (asset_type_strategy(), 0..MAJOR_LIMIT, any::<u32>())
}

/// Strategy for generating triples whose id can be re-tagged.
pub fn alternate_id_parts_strategy() -> impl Strategy<Value = (AssetType, u32, u32)> {
    (asset_type_strategy(), 0..ALTERNATE_MAJOR_LIMIT, any::<u32>())
}

/// Strategy for generating item names that fit the default name limit.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{0,11}( [A-Z][a-z]{0,8})?")
        .expect("Invalid regex")
        .prop_filter("Name must not be empty", |s| !s.is_empty())
}

/// Strategy for generating payee rows with distinct names and ids
/// `1..=len`.
pub fn payee_rows_strategy(max: usize) -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec((name_strategy(), any::<bool>()), 1..max.max(2)).prop_map(|payees| {
        payees
            .into_iter()
            .enumerate()
            .map(|(index, (name, closed))| {
                let id = ItemId::new(u32::try_from(index + 1).unwrap_or(u32::MAX));
                payee_row(id, &format!("{name} {index}"), closed)
            })
            .collect()
    })
}

/// A single edit of a payee.
#[derive(Debug, Clone, PartialEq)]
pub enum PayeeEdit {
    /// Replace the name.
    Rename(String),
    /// Set or clear the description.
    Describe(Option<String>),
    /// Open or close the payee.
    Close(bool),
}

impl PayeeEdit {
    /// The field the edit writes.
    pub fn field(&self) -> FieldId {
        match self {
            Self::Rename(_) => FieldId::Name,
            Self::Describe(_) => FieldId::Description,
            Self::Close(_) => FieldId::Closed,
        }
    }

    /// Applies the edit through the checked setter.
    ///
    /// # Errors
    ///
    /// As [`Entity::set_value`].
    pub fn apply(&self, item: &mut Entity, cipher: &dyn FieldCipher) -> CoreResult<()> {
        let value = match self {
            Self::Rename(name) => Some(FieldValue::text(name.clone())),
            Self::Describe(text) => text.clone().map(FieldValue::text),
            Self::Close(closed) => Some(FieldValue::Bool(*closed)),
        };
        item.set_value(self.field(), value, cipher)
    }
}

/// Strategy for generating a single payee edit.
pub fn payee_edit_strategy() -> impl Strategy<Value = PayeeEdit> {
    prop_oneof![
        name_strategy().prop_map(PayeeEdit::Rename),
        prop::option::of("[a-z ]{0,40}").prop_map(PayeeEdit::Describe),
        any::<bool>().prop_map(PayeeEdit::Close),
    ]
}

/// Strategy for generating a sequence of payee edits.
pub fn payee_edits_strategy(max: usize) -> impl Strategy<Value = Vec<PayeeEdit>> {
    prop::collection::vec(payee_edit_strategy(), 0..max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::strategy::ValueTree;
    use proptest::test_runner::TestRunner;

    #[test]
    fn payee_rows_have_sequential_ids() {
        let mut runner = TestRunner::default();
        let rows = payee_rows_strategy(8)
            .new_tree(&mut runner)
            .unwrap()
            .current();
        for (index, row) in rows.iter().enumerate() {
            assert_eq!(row.values.id, Some(ItemId::new(index as u32 + 1)));
        }
    }

    proptest! {
        #[test]
        fn names_fit_the_default_limit(name in name_strategy()) {
            prop_assert!(name.chars().count() <= 30);
        }
    }
}
