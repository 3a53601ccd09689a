//! Edit sessions committed back into a household.

use ledger_core::{
    CoreError, FieldId, FieldValue, ItemId, ItemState, ItemType, ListStyle, Resolver, SessionState,
};
use ledger_testkit::ids::*;
use ledger_testkit::prelude::*;

#[test]
fn rename_commit_and_save() {
    with_household_session(|data, edits| {
        edits
            .set_value(
                ItemType::Payee,
                BANK,
                FieldId::Name,
                Some(FieldValue::text("Hill Street Bank")),
            )
            .unwrap();
        assert_eq!(data.item(ItemType::Payee, BANK).unwrap().name(), Some("High Street Bank"));

        let summary = data.commit(edits).unwrap();
        assert_eq!(summary.changed, 1);
        assert_eq!(edits.state(), SessionState::Committed);

        let bank = data.item(ItemType::Payee, BANK).unwrap();
        assert_eq!(bank.name(), Some("Hill Street Bank"));
        assert_eq!(bank.state(), ItemState::Changed);
        assert_eq!(bank.changed_fields(), vec![FieldId::Name]);

        let update = data.derive_update_set().unwrap();
        assert_eq!(update.list(ItemType::Payee).unwrap().total_len(), 1);

        data.mark_saved();
        assert_eq!(data.item(ItemType::Payee, BANK).unwrap().state(), ItemState::Clean);
        assert!(data
            .derive_update_set()
            .unwrap()
            .lists()
            .lists()
            .all(|list| list.total_len() == 0));
    });
}

#[test]
fn links_follow_the_session_then_the_core() {
    with_household_session(|data, edits| {
        let card = edits.item(ItemType::Loan, CARD).unwrap();
        let institution = card.link(FieldId::Parent).unwrap();
        assert_eq!(institution.resolved_style(), Some(ListStyle::Edit));

        edits
            .set_value(
                ItemType::Loan,
                CARD,
                FieldId::Parent,
                Some(FieldValue::link(ItemType::Payee, SHOP)),
            )
            .unwrap();
        data.commit(edits).unwrap();

        let card = data.item(ItemType::Loan, CARD).unwrap();
        let institution = card.link(FieldId::Parent).unwrap();
        assert_eq!(institution.id, SHOP);
        assert_eq!(institution.resolved_style(), Some(ListStyle::Core));
        assert_eq!(data.target(institution).and_then(|payee| payee.name()), Some("Corner Shop"));
    });
}

#[test]
fn abandoned_session_leaves_core_untouched() {
    with_household_session(|data, edits| {
        edits.delete_item(ItemType::Payee, OLD_BANK).unwrap();
        edits.abandon().unwrap();

        assert!(matches!(
            data.commit(edits),
            Err(CoreError::InvalidOperation { .. })
        ));
        assert!(!data.item(ItemType::Payee, OLD_BANK).unwrap().is_deleted());
    });
}

#[test]
fn second_session_sees_a_deleted_counterpart() {
    let mut data = household();
    let mut first = data.derive_edit_set().unwrap();
    let mut second = data.derive_edit_set().unwrap();

    first.delete_item(ItemType::Payee, OLD_BANK).unwrap();
    data.commit(&mut first).unwrap();

    let err = data.commit(&mut second).unwrap_err();
    assert_eq!(err, CoreError::missing_counterpart(ItemType::Payee, OLD_BANK));
}

#[test]
fn new_items_from_parallel_sessions_clash() {
    let mut data = household();
    let mut first = data.derive_edit_set().unwrap();
    let mut second = data.derive_edit_set().unwrap();

    let a = first
        .add_new_item(ItemType::Payee, vec![(FieldId::Name, FieldValue::text("Market"))])
        .unwrap();
    let b = second
        .add_new_item(ItemType::Payee, vec![(FieldId::Name, FieldValue::text("Bakery"))])
        .unwrap();
    assert_eq!(a, b);

    data.commit(&mut first).unwrap();
    let err = data.commit(&mut second).unwrap_err();
    assert_eq!(err, CoreError::duplicate_id(ItemType::Payee, b));
    assert_eq!(data.item(ItemType::Payee, a).unwrap().name(), Some("Market"));
}

#[test]
fn conflicting_delete_is_refused_as_a_whole() {
    let mut data = household();
    let mut first = data.derive_edit_set().unwrap();
    let mut second = data.derive_edit_set().unwrap();

    first
        .set_value(
            ItemType::Loan,
            CARD,
            FieldId::Parent,
            Some(FieldValue::link(ItemType::Payee, SHOP)),
        )
        .unwrap();
    assert_eq!(data.commit(&mut first).unwrap().changed, 1);

    second.delete_item(ItemType::Payee, SHOP).unwrap();
    second
        .set_value(ItemType::Payee, BANK, FieldId::Name, Some(FieldValue::text("Hill Street Bank")))
        .unwrap();
    let err = data.commit(&mut second).unwrap_err();
    assert!(matches!(
        err,
        CoreError::UnresolvedLink { item_type: ItemType::Loan, field: FieldId::Parent, .. }
    ));

    assert_eq!(second.state(), SessionState::Active);
    let shop = data.item(ItemType::Payee, SHOP).unwrap();
    assert_eq!(shop.state(), ItemState::Clean);
    assert_eq!(data.item(ItemType::Payee, BANK).unwrap().name(), Some("High Street Bank"));
    let card = data.item(ItemType::Loan, CARD).unwrap();
    assert_eq!(card.link(FieldId::Parent).map(|link| link.id), Some(SHOP));
    assert_eq!(data.validate_all(), 0);

    second.abandon().unwrap();
    assert_eq!(second.state(), SessionState::Abandoned);
}

#[test]
fn difference_against_a_clone() {
    let mut data = household();
    let before = data.derive_clone_set().unwrap();

    let mut edits = data.derive_edit_set().unwrap();
    edits
        .set_value(
            ItemType::Deposit,
            CURRENT,
            FieldId::Closed,
            Some(FieldValue::Bool(true)),
        )
        .unwrap();
    let cash = edits
        .add_new_item(
            ItemType::Cash,
            vec![
                (FieldId::Name, FieldValue::text("Float")),
                (
                    FieldId::Category,
                    FieldValue::link(ItemType::CashCategory, WALLET_CATEGORY),
                ),
                (FieldId::Currency, FieldValue::Currency(gbp())),
            ],
        )
        .unwrap();
    edits.delete_item(ItemType::Loan, CARD).unwrap();
    let summary = data.commit(&mut edits).unwrap();
    assert_eq!(summary.added, 1);
    assert_eq!(summary.changed, 1);
    // The card and its account-number record.
    assert_eq!(summary.deleted, 2);

    let diff = data.derive_difference_set(&before).unwrap();
    assert_eq!(diff.item(ItemType::Cash, cash).unwrap().state(), ItemState::New);
    assert_eq!(diff.item(ItemType::Loan, CARD).unwrap().state(), ItemState::Deleted);
    assert_eq!(
        diff.item(ItemType::LoanInfo, ItemId::new(1)).unwrap().state(),
        ItemState::Deleted
    );
    let current = diff.item(ItemType::Deposit, CURRENT).unwrap();
    assert_eq!(current.changed_fields(), vec![FieldId::Closed]);
    assert!(diff.item(ItemType::Payee, BANK).is_none());
}

#[test]
fn rows_file_loads_into_a_data_set() {
    let file = write_rows_file(&household_rows());
    let text = std::fs::read_to_string(file.path()).unwrap();
    let rows: Vec<Row> = serde_json::from_str(&text).unwrap();

    let mut data = load(&rows).unwrap();
    assert_eq!(data.validate_all(), 0);
    assert_eq!(data.list(ItemType::TransactionCategory).unwrap().len(), 6);
    assert_eq!(
        data.info_view(ItemType::Deposit, BOND).unwrap().maturity(),
        Some(bond_maturity())
    );
}
