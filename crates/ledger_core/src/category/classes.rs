//! Category classes of each family.

use crate::category::{CategoryFamily, ClassRules};

/// Classes of transaction categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransactionClass {
    /// Salary and other taxed income.
    TaxedIncome,
    /// Rental income.
    RentalIncome,
    /// Interest received.
    Interest,
    /// Dividends received.
    Dividend,
    /// Gifts and inheritance.
    GiftedIncome,
    /// Any other income.
    OtherIncome,
    /// Ordinary expense.
    Expense,
    /// Local taxes.
    LocalTaxes,
    /// Tax relief.
    TaxRelief,
    /// Transfer between accounts.
    Transfer,
    /// Stock split.
    StockSplit,
    /// Stock takeover.
    StockTakeover,
    /// Parent of all income categories.
    IncomeTotals,
    /// Parent of all expense categories.
    ExpenseTotals,
    /// Parent of security transfer categories.
    SecurityParent,
    /// Root of the category tree.
    Totals,
}

impl ClassRules for TransactionClass {
    const FAMILY: CategoryFamily = CategoryFamily::Transaction;
    const ALL: &'static [Self] = &[
        Self::TaxedIncome,
        Self::RentalIncome,
        Self::Interest,
        Self::Dividend,
        Self::GiftedIncome,
        Self::OtherIncome,
        Self::Expense,
        Self::LocalTaxes,
        Self::TaxRelief,
        Self::Transfer,
        Self::StockSplit,
        Self::StockTakeover,
        Self::IncomeTotals,
        Self::ExpenseTotals,
        Self::SecurityParent,
        Self::Totals,
    ];

    fn id(self) -> u32 {
        match self {
            Self::TaxedIncome => 1,
            Self::RentalIncome => 2,
            Self::Interest => 3,
            Self::Dividend => 4,
            Self::GiftedIncome => 5,
            Self::OtherIncome => 6,
            Self::Expense => 10,
            Self::LocalTaxes => 11,
            Self::TaxRelief => 12,
            Self::Transfer => 20,
            Self::StockSplit => 21,
            Self::StockTakeover => 22,
            Self::IncomeTotals => 30,
            Self::ExpenseTotals => 31,
            Self::SecurityParent => 32,
            Self::Totals => 40,
        }
    }

    fn is_singular(self) -> bool {
        matches!(
            self,
            Self::TaxRelief
                | Self::Transfer
                | Self::StockSplit
                | Self::StockTakeover
                | Self::IncomeTotals
                | Self::ExpenseTotals
                | Self::SecurityParent
                | Self::Totals
        )
    }

    fn is_totals(self) -> bool {
        self == Self::Totals
    }

    fn is_subtotals(self) -> bool {
        matches!(
            self,
            Self::IncomeTotals | Self::ExpenseTotals | Self::SecurityParent
        )
    }

    fn is_income(self) -> bool {
        matches!(
            self,
            Self::TaxedIncome
                | Self::RentalIncome
                | Self::Interest
                | Self::Dividend
                | Self::GiftedIncome
                | Self::OtherIncome
                | Self::IncomeTotals
        )
    }

    fn is_security_transfer(self) -> bool {
        matches!(
            self,
            Self::StockSplit | Self::StockTakeover | Self::SecurityParent
        )
    }

    fn is_expense(self) -> bool {
        matches!(self, Self::Expense | Self::LocalTaxes)
    }

    fn can_parent_child(self, child: Self) -> bool {
        match self {
            Self::Totals => child.is_subtotals(),
            Self::IncomeTotals => child.is_income() && !child.is_subtotals(),
            Self::ExpenseTotals => {
                !child.is_income()
                    && !child.is_security_transfer()
                    && !child.is_subtotals()
                    && !child.is_totals()
            }
            Self::SecurityParent => child.is_security_transfer() && !child.is_subtotals(),
            _ => false,
        }
    }

    fn default_child(parent: Option<Self>) -> Self {
        match parent {
            Some(Self::Totals) => Self::ExpenseTotals,
            Some(Self::IncomeTotals) => Self::TaxedIncome,
            Some(Self::SecurityParent) => Self::StockSplit,
            _ => Self::Expense,
        }
    }

    fn resource_key(self) -> &'static str {
        match self {
            Self::TaxedIncome => "TransactionClass.TaxedIncome",
            Self::RentalIncome => "TransactionClass.RentalIncome",
            Self::Interest => "TransactionClass.Interest",
            Self::Dividend => "TransactionClass.Dividend",
            Self::GiftedIncome => "TransactionClass.GiftedIncome",
            Self::OtherIncome => "TransactionClass.OtherIncome",
            Self::Expense => "TransactionClass.Expense",
            Self::LocalTaxes => "TransactionClass.LocalTaxes",
            Self::TaxRelief => "TransactionClass.TaxRelief",
            Self::Transfer => "TransactionClass.Transfer",
            Self::StockSplit => "TransactionClass.StockSplit",
            Self::StockTakeover => "TransactionClass.StockTakeover",
            Self::IncomeTotals => "TransactionClass.IncomeTotals",
            Self::ExpenseTotals => "TransactionClass.ExpenseTotals",
            Self::SecurityParent => "TransactionClass.SecurityParent",
            Self::Totals => "TransactionClass.Totals",
        }
    }
}

/// Classes of cash categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CashClass {
    /// Ordinary cash account.
    Cash,
    /// Cash spent as it is received, booked against an expense category.
    AutoExpense,
    /// Parent of cash categories.
    Parent,
}

impl ClassRules for CashClass {
    const FAMILY: CategoryFamily = CategoryFamily::Cash;
    const ALL: &'static [Self] = &[Self::Cash, Self::AutoExpense, Self::Parent];

    fn id(self) -> u32 {
        match self {
            Self::Cash => 1,
            Self::AutoExpense => 2,
            Self::Parent => 3,
        }
    }

    fn is_totals(self) -> bool {
        self == Self::Parent
    }

    fn can_parent_child(self, child: Self) -> bool {
        self == Self::Parent && child != Self::Parent
    }

    fn default_child(_parent: Option<Self>) -> Self {
        Self::Cash
    }

    fn resource_key(self) -> &'static str {
        match self {
            Self::Cash => "CashClass.Cash",
            Self::AutoExpense => "CashClass.AutoExpense",
            Self::Parent => "CashClass.Parent",
        }
    }
}

/// Classes of deposit categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DepositClass {
    /// Current account.
    Checking,
    /// Savings account.
    Savings,
    /// Tax-free savings account.
    TaxFreeSavings,
    /// Fixed-term bond.
    Bond,
    /// Tax-free fixed-term bond.
    TaxFreeBond,
    /// Peer-to-peer lending.
    Peer2Peer,
    /// Parent of deposit categories.
    Parent,
}

impl DepositClass {
    /// Returns true for fixed-term classes that carry a maturity date.
    #[must_use]
    pub fn has_maturity(self) -> bool {
        matches!(self, Self::Bond | Self::TaxFreeBond)
    }
}

impl ClassRules for DepositClass {
    const FAMILY: CategoryFamily = CategoryFamily::Deposit;
    const ALL: &'static [Self] = &[
        Self::Checking,
        Self::Savings,
        Self::TaxFreeSavings,
        Self::Bond,
        Self::TaxFreeBond,
        Self::Peer2Peer,
        Self::Parent,
    ];

    fn id(self) -> u32 {
        match self {
            Self::Checking => 1,
            Self::Savings => 2,
            Self::TaxFreeSavings => 3,
            Self::Bond => 4,
            Self::TaxFreeBond => 5,
            Self::Peer2Peer => 6,
            Self::Parent => 7,
        }
    }

    fn is_totals(self) -> bool {
        self == Self::Parent
    }

    fn can_parent_child(self, child: Self) -> bool {
        self == Self::Parent && child != Self::Parent
    }

    fn default_child(_parent: Option<Self>) -> Self {
        Self::Checking
    }

    fn resource_key(self) -> &'static str {
        match self {
            Self::Checking => "DepositClass.Checking",
            Self::Savings => "DepositClass.Savings",
            Self::TaxFreeSavings => "DepositClass.TaxFreeSavings",
            Self::Bond => "DepositClass.Bond",
            Self::TaxFreeBond => "DepositClass.TaxFreeBond",
            Self::Peer2Peer => "DepositClass.Peer2Peer",
            Self::Parent => "DepositClass.Parent",
        }
    }
}

/// Classes of loan categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoanClass {
    /// Credit card.
    CreditCard,
    /// Loan between individuals.
    PrivateLoan,
    /// Loan from an institution.
    Loan,
    /// Parent of loan categories.
    Parent,
}

impl ClassRules for LoanClass {
    const FAMILY: CategoryFamily = CategoryFamily::Loan;
    const ALL: &'static [Self] = &[Self::CreditCard, Self::PrivateLoan, Self::Loan, Self::Parent];

    fn id(self) -> u32 {
        match self {
            Self::CreditCard => 1,
            Self::PrivateLoan => 2,
            Self::Loan => 3,
            Self::Parent => 4,
        }
    }

    fn is_totals(self) -> bool {
        self == Self::Parent
    }

    fn can_parent_child(self, child: Self) -> bool {
        self == Self::Parent && child != Self::Parent
    }

    fn default_child(_parent: Option<Self>) -> Self {
        Self::CreditCard
    }

    fn resource_key(self) -> &'static str {
        match self {
            Self::CreditCard => "LoanClass.CreditCard",
            Self::PrivateLoan => "LoanClass.PrivateLoan",
            Self::Loan => "LoanClass.Loan",
            Self::Parent => "LoanClass.Parent",
        }
    }
}
