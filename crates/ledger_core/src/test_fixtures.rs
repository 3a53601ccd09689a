//! Small resolved data set shared by unit tests.

use crate::category::{CashClass, CategoryClass, TransactionClass};
use crate::config::Config;
use crate::dataset::DataSet;
use crate::info::InfoClass;
use crate::static_data::StaticData;
use crate::types::{Currency, ItemId, ItemType};
use crate::value::{FieldId, FieldValue, ValuesIn};

pub(crate) const TOTALS: ItemId = ItemId::new(1);
pub(crate) const EXPENSES: ItemId = ItemId::new(2);
pub(crate) const FOOD: ItemId = ItemId::new(3);
pub(crate) const CASH_PARENT: ItemId = ItemId::new(1);
pub(crate) const CASH_PLAIN: ItemId = ItemId::new(2);
pub(crate) const CASH_AUTO: ItemId = ItemId::new(3);
pub(crate) const BANK: ItemId = ItemId::new(1);
pub(crate) const SHOP: ItemId = ItemId::new(2);
pub(crate) const WALLET: ItemId = ItemId::new(1);

pub(crate) fn category(
    item_type: ItemType,
    id: ItemId,
    name: &str,
    class: CategoryClass,
    parent: Option<ItemId>,
) -> ValuesIn {
    let values = ValuesIn::new(id)
        .with(FieldId::Name, FieldValue::text(name))
        .with(FieldId::CategoryType, FieldValue::Integer(class.id().into()));
    match parent {
        Some(parent) => values.with(FieldId::Parent, FieldValue::link(item_type, parent)),
        None => values,
    }
}

fn tx(class: TransactionClass) -> CategoryClass {
    CategoryClass::Transaction(class)
}

fn cash(class: CashClass) -> CategoryClass {
    CategoryClass::Cash(class)
}

/// Transaction tree `Totals > Expenses > Expenses:Food`, cash categories
/// `Cash > Cash:Wallet, Cash:Auto`, two payees and one plain cash account
/// with a note.
pub(crate) fn sample() -> DataSet {
    let mut data = DataSet::new(Config::default(), StaticData::standard());
    let tc = ItemType::TransactionCategory;
    let cc = ItemType::CashCategory;
    let rows = [
        (tc, category(tc, TOTALS, "Totals", tx(TransactionClass::Totals), None)),
        (
            tc,
            category(tc, EXPENSES, "Expenses", tx(TransactionClass::ExpenseTotals), Some(TOTALS)),
        ),
        (
            tc,
            category(tc, FOOD, "Expenses:Food", tx(TransactionClass::Expense), Some(EXPENSES)),
        ),
        (cc, category(cc, CASH_PARENT, "Cash", cash(CashClass::Parent), None)),
        (
            cc,
            category(cc, CASH_PLAIN, "Cash:Wallet", cash(CashClass::Cash), Some(CASH_PARENT)),
        ),
        (
            cc,
            category(cc, CASH_AUTO, "Cash:Auto", cash(CashClass::AutoExpense), Some(CASH_PARENT)),
        ),
        (
            ItemType::Payee,
            ValuesIn::new(BANK).with(FieldId::Name, FieldValue::text("Bank")),
        ),
        (
            ItemType::Payee,
            ValuesIn::new(SHOP)
                .with(FieldId::Name, FieldValue::text("Corner Shop"))
                .with(FieldId::Closed, FieldValue::Bool(false)),
        ),
        (
            ItemType::Cash,
            ValuesIn::new(WALLET)
                .with(FieldId::Name, FieldValue::text("Wallet"))
                .with(FieldId::Category, FieldValue::link(cc, CASH_PLAIN))
                .with(FieldId::Currency, FieldValue::Currency(Currency::new("GBP"))),
        ),
        (
            ItemType::CashInfo,
            ValuesIn::new(ItemId::new(1))
                .with(FieldId::Owner, FieldValue::link(ItemType::Cash, WALLET))
                .with(FieldId::InfoClass, FieldValue::Integer(InfoClass::Notes.id().into()))
                .with(FieldId::Value, FieldValue::text("kept in drawer")),
        ),
    ];
    for (item_type, values) in &rows {
        data.add_values_item(*item_type, values).unwrap();
    }
    data.resolve_data_set_links().unwrap();
    data
}
