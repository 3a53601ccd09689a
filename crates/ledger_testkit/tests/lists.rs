//! Entity list behaviour across list styles.

use ledger_core::{
    CoreError, EntityList, FieldId, FieldValue, ItemId, ItemType, ListStyle, PlainCipher, ValuesIn,
};
use ledger_testkit::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;

fn core_list(item_type: ItemType) -> EntityList {
    EntityList::new(item_type, ListStyle::Core, Arc::new(standard_statics()))
}

#[test]
fn second_row_with_same_id_is_rejected() {
    let mut list = core_list(ItemType::Payee);
    let row = payee_row(ItemId::new(9), "Bank", false);
    list.add_values_item(&row.values, &PlainCipher).unwrap();

    let again = payee_row(ItemId::new(9), "Other Bank", false);
    let err = list.add_values_item(&again.values, &PlainCipher).unwrap_err();
    assert_eq!(err, CoreError::duplicate_id(ItemType::Payee, ItemId::new(9)));
    assert_eq!(list.len(), 1);
    assert_eq!(list.find_item_by_id(ItemId::new(9)).unwrap().name(), Some("Bank"));
}

#[test]
fn values_out_reloads_identically() {
    let data = household();
    for list in data.lists().lists() {
        let mut copy = EntityList::new(list.item_type(), ListStyle::Clone, Arc::new(standard_statics()));
        for item in list.iter() {
            let loaded = copy.add_values_item(&item.values_out(), &PlainCipher).unwrap();
            assert_eq!(loaded.values(), item.values());
        }
    }
}

#[test]
fn rows_without_ids_are_numbered() {
    let mut list = core_list(ItemType::Payee);
    list.add_values_item(&payee_row(ItemId::new(4), "Bank", false).values, &PlainCipher)
        .unwrap();
    let unnumbered = ValuesIn::unnumbered().with(FieldId::Name, FieldValue::text("Shop"));
    let id = list.add_values_item(&unnumbered, &PlainCipher).unwrap().id();
    assert_eq!(id, ItemId::new(5));
    assert_eq!(list.find_item_by_name("Shop").map(|item| item.id()), Some(id));
}

#[test]
fn undeclared_field_is_rejected() {
    let mut list = core_list(ItemType::Payee);
    let row = ValuesIn::new(ItemId::new(1))
        .with(FieldId::Name, FieldValue::text("Bank"))
        .with(FieldId::Currency, FieldValue::Currency(gbp()));
    let err = list.add_values_item(&row, &PlainCipher).unwrap_err();
    assert!(matches!(err, CoreError::UnknownField { .. }));
    assert!(list.is_empty());
}

proptest! {
    #[test]
    fn derived_edit_list_is_an_independent_copy(
        rows in payee_rows_strategy(10),
        deleted in prop::collection::vec(any::<bool>(), 10),
        rename in name_strategy(),
    ) {
        let mut core = core_list(ItemType::Payee);
        for row in &rows {
            core.add_values_item(&row.values, &PlainCipher).unwrap();
        }
        for (row, delete) in rows.iter().zip(&deleted) {
            if *delete {
                core.delete_item(row.values.id.unwrap()).unwrap();
            }
        }

        let mut edit = core.derive_edit_list();
        prop_assert_eq!(edit.style(), ListStyle::Edit);
        prop_assert_eq!(edit.len(), core.len());
        prop_assert_eq!(edit.next_id(), core.next_id());
        for item in core.iter() {
            let copy = edit.find_item_by_id(item.id()).unwrap();
            prop_assert_eq!(copy.values(), item.values());
            prop_assert_eq!(copy.style(), ListStyle::Edit);
        }

        if let Some(first) = core.iter().next().map(|item| item.id()) {
            let original = core.find_item_by_id(first).unwrap().values().clone();
            edit.edit_item(first, |item| {
                PayeeEdit::Rename(rename.clone()).apply(item, &PlainCipher)
            })
            .unwrap()
            .unwrap();
            prop_assert_eq!(core.find_item_by_id(first).unwrap().values(), &original);
            prop_assert_eq!(
                edit.find_item_by_id(first).unwrap().name(),
                Some(rename.as_str())
            );
        };
    }

    #[test]
    fn new_ids_are_never_reused(rows in payee_rows_strategy(10)) {
        let mut core = core_list(ItemType::Payee);
        for row in &rows {
            core.add_values_item(&row.values, &PlainCipher).unwrap();
        }
        let last = rows.last().and_then(|row| row.values.id).unwrap();
        core.delete_item(last).unwrap();
        core.purge_deleted();

        let mut edit = core.derive_edit_list();
        let fresh = edit.add_new_item().unwrap();
        prop_assert!(fresh > last);
    }
}
