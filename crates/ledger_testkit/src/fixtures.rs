//! Test fixtures and data set helpers.
//!
//! Provides row builders for every item type, a resolved sample household
//! and helpers for writing row documents to temporary files.

use chrono::NaiveDate;
use ledger_core::category::{CashClass, DepositClass, LoanClass, TransactionClass};
use ledger_core::{
    CategoryClass, Config, CoreResult, Currency, DataSet, EditSet, FieldId, FieldValue, InfoClass,
    ItemId, ItemType, Money, StaticData, ValuesIn,
};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tempfile::NamedTempFile;

/// One loader row: the values of an item plus the list it belongs to.
///
/// Serialises as `{"item_type": .., "id": .., "fields": [..]}`, the shape
/// the `ledger check` command reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// List the row is loaded into.
    pub item_type: ItemType,
    /// Id and field values.
    #[serde(flatten)]
    pub values: ValuesIn,
}

impl Row {
    /// Creates a row.
    pub fn new(item_type: ItemType, values: ValuesIn) -> Self {
        Self { item_type, values }
    }
}

/// Static tables with one enabled row per class.
pub fn standard_statics() -> StaticData {
    StaticData::standard()
}

/// An empty core data set over the standard tables.
pub fn empty_data_set() -> DataSet {
    DataSet::new(Config::default(), standard_statics())
}

/// Row of a category.
pub fn category_row(
    item_type: ItemType,
    id: ItemId,
    name: &str,
    class: CategoryClass,
    parent: Option<ItemId>,
) -> Row {
    let values = ValuesIn::new(id)
        .with(FieldId::Name, FieldValue::text(name))
        .with(FieldId::CategoryType, FieldValue::Integer(class.id().into()));
    let values = match parent {
        Some(parent) => values.with(FieldId::Parent, FieldValue::link(item_type, parent)),
        None => values,
    };
    Row::new(item_type, values)
}

/// Row of a transaction category.
pub fn transaction_category(
    id: ItemId,
    name: &str,
    class: TransactionClass,
    parent: Option<ItemId>,
) -> Row {
    category_row(
        ItemType::TransactionCategory,
        id,
        name,
        CategoryClass::Transaction(class),
        parent,
    )
}

/// Row of a payee.
pub fn payee_row(id: ItemId, name: &str, closed: bool) -> Row {
    let mut values = ValuesIn::new(id).with(FieldId::Name, FieldValue::text(name));
    if closed {
        values = values.with(FieldId::Closed, FieldValue::Bool(true));
    }
    Row::new(ItemType::Payee, values)
}

/// Row of an account.
///
/// `institution` is the holding payee of deposit and loan accounts; cash
/// accounts have none.
pub fn account_row(
    item_type: ItemType,
    id: ItemId,
    name: &str,
    category: ItemId,
    institution: Option<ItemId>,
) -> Row {
    let category_type = item_type
        .account_category()
        .unwrap_or(ItemType::CashCategory);
    let mut values = ValuesIn::new(id)
        .with(FieldId::Name, FieldValue::text(name))
        .with(FieldId::Category, FieldValue::link(category_type, category))
        .with(FieldId::Currency, FieldValue::Currency(gbp()));
    if let Some(institution) = institution {
        values = values.with(FieldId::Parent, FieldValue::link(ItemType::Payee, institution));
    }
    Row::new(item_type, values)
}

/// Row of an attribute record of `owner`.
///
/// # Panics
///
/// Panics if `owner_type` carries no attributes.
pub fn info_row(
    owner_type: ItemType,
    id: ItemId,
    owner: ItemId,
    class: InfoClass,
    value: FieldValue,
) -> Row {
    let info_type = owner_type
        .info_type()
        .expect("owner type carries no attributes");
    let values = ValuesIn::new(id)
        .with(FieldId::Owner, FieldValue::link(owner_type, owner))
        .with(FieldId::InfoClass, FieldValue::Integer(class.id().into()))
        .with(FieldId::Value, value);
    Row::new(info_type, values)
}

/// Pound sterling.
pub fn gbp() -> Currency {
    Currency::new("GBP")
}

/// An amount in pence.
pub fn pounds(pence: i64) -> FieldValue {
    FieldValue::Money(Money::new(pence, gbp()))
}

/// Loads rows into a fresh core data set and resolves it.
///
/// # Errors
///
/// Fails on the first row that does not load or if the rows do not
/// resolve.
pub fn load(rows: &[Row]) -> CoreResult<DataSet> {
    let mut data = empty_data_set();
    for row in rows {
        data.add_values_item(row.item_type, &row.values)?;
    }
    data.resolve_data_set_links()?;
    Ok(data)
}

/// Ids of the items in [`household`].
pub mod ids {
    use ledger_core::ItemId;

    /// Transaction category "Totals".
    pub const TOTALS: ItemId = ItemId::new(1);
    /// Transaction category "Income".
    pub const INCOME: ItemId = ItemId::new(2);
    /// Transaction category "Income:Salary".
    pub const SALARY: ItemId = ItemId::new(3);
    /// Transaction category "Expenses".
    pub const EXPENSES: ItemId = ItemId::new(4);
    /// Transaction category "Expenses:Food".
    pub const FOOD: ItemId = ItemId::new(5);
    /// Transaction category "Expenses:Travel".
    pub const TRAVEL: ItemId = ItemId::new(6);

    /// Deposit category "Deposits".
    pub const DEPOSITS: ItemId = ItemId::new(1);
    /// Deposit category "Deposits:Current".
    pub const CURRENT_CATEGORY: ItemId = ItemId::new(2);
    /// Deposit category "Deposits:Bonds".
    pub const BOND_CATEGORY: ItemId = ItemId::new(3);

    /// Cash category "Cash".
    pub const CASH: ItemId = ItemId::new(1);
    /// Cash category "Cash:Wallet".
    pub const WALLET_CATEGORY: ItemId = ItemId::new(2);
    /// Cash category "Cash:Auto".
    pub const AUTO_CATEGORY: ItemId = ItemId::new(3);

    /// Loan category "Loans".
    pub const LOANS: ItemId = ItemId::new(1);
    /// Loan category "Loans:Cards".
    pub const CARD_CATEGORY: ItemId = ItemId::new(2);

    /// Payee "High Street Bank".
    pub const BANK: ItemId = ItemId::new(1);
    /// Payee "Corner Shop".
    pub const SHOP: ItemId = ItemId::new(2);
    /// Closed payee "Old Bank".
    pub const OLD_BANK: ItemId = ItemId::new(3);

    /// Deposit account "Current Account".
    pub const CURRENT: ItemId = ItemId::new(1);
    /// Deposit account "Fixed Bond".
    pub const BOND: ItemId = ItemId::new(2);
    /// Cash account "Wallet".
    pub const WALLET: ItemId = ItemId::new(1);
    /// Loan account "Credit Card".
    pub const CARD: ItemId = ItemId::new(1);
}

/// Maturity date of the household bond.
pub fn bond_maturity() -> NaiveDate {
    NaiveDate::from_ymd_opt(2027, 6, 30).expect("valid date")
}

/// Rows of a small household: a full transaction tree, one category tree
/// per account family, three payees, four accounts and their attributes.
/// Every item validates clean.
pub fn household_rows() -> Vec<Row> {
    use ids::*;

    let deposit = |class| CategoryClass::Deposit(class);
    let cash = |class| CategoryClass::Cash(class);
    let loan = |class| CategoryClass::Loan(class);
    let dc = ItemType::DepositCategory;
    let cc = ItemType::CashCategory;
    let lc = ItemType::LoanCategory;

    vec![
        category_row(dc, DEPOSITS, "Deposits", deposit(DepositClass::Parent), None),
        category_row(
            dc,
            CURRENT_CATEGORY,
            "Deposits:Current",
            deposit(DepositClass::Checking),
            Some(DEPOSITS),
        ),
        category_row(
            dc,
            BOND_CATEGORY,
            "Deposits:Bonds",
            deposit(DepositClass::Bond),
            Some(DEPOSITS),
        ),
        category_row(cc, CASH, "Cash", cash(CashClass::Parent), None),
        category_row(
            cc,
            WALLET_CATEGORY,
            "Cash:Wallet",
            cash(CashClass::Cash),
            Some(CASH),
        ),
        category_row(
            cc,
            AUTO_CATEGORY,
            "Cash:Auto",
            cash(CashClass::AutoExpense),
            Some(CASH),
        ),
        category_row(lc, LOANS, "Loans", loan(LoanClass::Parent), None),
        category_row(
            lc,
            CARD_CATEGORY,
            "Loans:Cards",
            loan(LoanClass::CreditCard),
            Some(LOANS),
        ),
        transaction_category(TOTALS, "Totals", TransactionClass::Totals, None),
        transaction_category(INCOME, "Income", TransactionClass::IncomeTotals, Some(TOTALS)),
        transaction_category(
            SALARY,
            "Income:Salary",
            TransactionClass::TaxedIncome,
            Some(INCOME),
        ),
        transaction_category(
            EXPENSES,
            "Expenses",
            TransactionClass::ExpenseTotals,
            Some(TOTALS),
        ),
        transaction_category(FOOD, "Expenses:Food", TransactionClass::Expense, Some(EXPENSES)),
        transaction_category(
            TRAVEL,
            "Expenses:Travel",
            TransactionClass::Expense,
            Some(EXPENSES),
        ),
        payee_row(BANK, "High Street Bank", false),
        payee_row(SHOP, "Corner Shop", false),
        payee_row(OLD_BANK, "Old Bank", true),
        account_row(
            ItemType::Deposit,
            CURRENT,
            "Current Account",
            CURRENT_CATEGORY,
            Some(BANK),
        ),
        account_row(ItemType::Deposit, BOND, "Fixed Bond", BOND_CATEGORY, Some(BANK)),
        account_row(ItemType::Cash, WALLET, "Wallet", WALLET_CATEGORY, None),
        account_row(ItemType::Loan, CARD, "Credit Card", CARD_CATEGORY, Some(BANK)),
        info_row(
            ItemType::Deposit,
            ItemId::new(1),
            CURRENT,
            InfoClass::SortCode,
            FieldValue::text("12-34-56"),
        ),
        info_row(
            ItemType::Deposit,
            ItemId::new(2),
            BOND,
            InfoClass::Maturity,
            FieldValue::Date(bond_maturity()),
        ),
        info_row(
            ItemType::Cash,
            ItemId::new(1),
            WALLET,
            InfoClass::Notes,
            FieldValue::text("kept in the kitchen drawer"),
        ),
        info_row(
            ItemType::Cash,
            ItemId::new(2),
            WALLET,
            InfoClass::OpeningBalance,
            pounds(2_500),
        ),
        info_row(
            ItemType::Loan,
            ItemId::new(1),
            CARD,
            InfoClass::Account,
            FieldValue::text("ending 4242"),
        ),
    ]
}

/// The household of [`household_rows`], loaded and resolved.
///
/// # Panics
///
/// Panics if the fixture rows no longer load.
pub fn household() -> DataSet {
    load(&household_rows()).expect("household rows load")
}

/// Runs a test against an edit session over a fresh household.
///
/// # Example
///
/// ```rust,ignore
/// use ledger_testkit::with_household_session;
///
/// with_household_session(|data, edits| {
///     // ... edit, then data.commit(edits)
/// });
/// ```
pub fn with_household_session<F, R>(f: F) -> R
where
    F: FnOnce(&mut DataSet, &mut EditSet) -> R,
{
    let mut data = household();
    let mut edits = data
        .derive_edit_set()
        .expect("household derives an edit set");
    f(&mut data, &mut edits)
}

/// Writes rows as a JSON array to a temporary file.
///
/// The file is removed when the returned handle is dropped.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_rows_file(rows: &[Row]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    serde_json::to_writer_pretty(&mut file, rows).expect("Failed to write rows");
    file.flush().expect("Failed to flush rows");
    file
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn household_validates_clean() {
        let mut data = household();
        assert_eq!(data.validate_all(), 0);
    }

    #[test]
    fn rows_round_trip_through_json() {
        let rows = household_rows();
        let json = serde_json::to_string(&rows).unwrap();
        let back: Vec<Row> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn rows_file_is_readable() {
        let rows = vec![payee_row(ids::BANK, "Bank", false)];
        let file = write_rows_file(&rows);
        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.contains("\"item_type\": \"payee\""));
    }
}
