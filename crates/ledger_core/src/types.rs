//! Core type definitions for the ledger.

use crate::category::CategoryFamily;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an item within its owning list.
///
/// Ids are allocated from a single per-list counter and are never reused
/// while the owning list is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl ItemId {
    /// Creates a new item id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The role a list (and every item in it) plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListStyle {
    /// Authoritative committed data.
    Core,
    /// Isolated working copy used by an edit session.
    Edit,
    /// Deep copy of a core data set.
    Clone,
    /// Structural delta between two data sets.
    Difference,
    /// Pending changes awaiting persistence.
    Update,
}

impl fmt::Display for ListStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Core => "core",
            Self::Edit => "edit",
            Self::Clone => "clone",
            Self::Difference => "difference",
            Self::Update => "update",
        };
        f.write_str(name)
    }
}

/// Concrete item types, declared in dependency order.
///
/// A reference may only target an item of an earlier or the same type, so
/// lists are loaded, derived, resolved and committed in this order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Category of deposit accounts.
    DepositCategory,
    /// Category of cash accounts.
    CashCategory,
    /// Category of loan accounts.
    LoanCategory,
    /// Category of transactions.
    TransactionCategory,
    /// Counterparty or institution.
    Payee,
    /// Deposit account.
    Deposit,
    /// Cash account.
    Cash,
    /// Loan account.
    Loan,
    /// Optional attributes of a deposit account.
    DepositInfo,
    /// Optional attributes of a cash account.
    CashInfo,
    /// Optional attributes of a loan account.
    LoanInfo,
}

impl ItemType {
    /// Every item type in dependency order.
    pub const ALL: [ItemType; 11] = [
        Self::DepositCategory,
        Self::CashCategory,
        Self::LoanCategory,
        Self::TransactionCategory,
        Self::Payee,
        Self::Deposit,
        Self::Cash,
        Self::Loan,
        Self::DepositInfo,
        Self::CashInfo,
        Self::LoanInfo,
    ];

    /// Returns the display name of the type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DepositCategory => "DepositCategory",
            Self::CashCategory => "CashCategory",
            Self::LoanCategory => "LoanCategory",
            Self::TransactionCategory => "TransactionCategory",
            Self::Payee => "Payee",
            Self::Deposit => "Deposit",
            Self::Cash => "Cash",
            Self::Loan => "Loan",
            Self::DepositInfo => "DepositInfo",
            Self::CashInfo => "CashInfo",
            Self::LoanInfo => "LoanInfo",
        }
    }

    /// Returns the category family if this is a category type.
    #[must_use]
    pub const fn category_family(self) -> Option<CategoryFamily> {
        match self {
            Self::DepositCategory => Some(CategoryFamily::Deposit),
            Self::CashCategory => Some(CategoryFamily::Cash),
            Self::LoanCategory => Some(CategoryFamily::Loan),
            Self::TransactionCategory => Some(CategoryFamily::Transaction),
            _ => None,
        }
    }

    /// Returns the category type an account of this type is classified by.
    #[must_use]
    pub const fn account_category(self) -> Option<ItemType> {
        match self {
            Self::Deposit => Some(Self::DepositCategory),
            Self::Cash => Some(Self::CashCategory),
            Self::Loan => Some(Self::LoanCategory),
            _ => None,
        }
    }

    /// Returns the info list type holding this owner's attributes.
    #[must_use]
    pub const fn info_type(self) -> Option<ItemType> {
        match self {
            Self::Deposit => Some(Self::DepositInfo),
            Self::Cash => Some(Self::CashInfo),
            Self::Loan => Some(Self::LoanInfo),
            _ => None,
        }
    }

    /// Returns the owner type of an info list type.
    #[must_use]
    pub const fn info_owner(self) -> Option<ItemType> {
        match self {
            Self::DepositInfo => Some(Self::Deposit),
            Self::CashInfo => Some(Self::Cash),
            Self::LoanInfo => Some(Self::Loan),
            _ => None,
        }
    }

    /// Returns true for the four category types.
    #[must_use]
    pub const fn is_category(self) -> bool {
        self.category_family().is_some()
    }

    /// Returns true for items that carry a list-unique name.
    #[must_use]
    pub const fn is_named(self) -> bool {
        self.info_owner().is_none()
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// ISO-4217 style currency code, treated as an opaque comparable value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Creates a currency from its code, normalised to upper case.
    #[must_use]
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase())
    }

    /// Returns the currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An amount in minor units of a currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in minor units (pence, cents).
    pub amount: i64,
    /// Currency of the amount.
    pub currency: Currency,
}

impl Money {
    /// Creates a money value.
    #[must_use]
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        write!(f, "{sign}{}.{:02} {}", abs / 100, abs % 100, self.currency)
    }
}
