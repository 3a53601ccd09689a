//! Category classification and hierarchy rules.
//!
//! Each category type belongs to a [`CategoryFamily`]. A category's
//! `CategoryType` field points at a row of the family's static type table,
//! and that row names the category's class. Classes decide how categories
//! may be nested:
//!
//! - a *totals* class is a root and takes no parent;
//! - a *subtotals* class must sit directly below a totals category;
//! - every other class needs a parent that can parent it, shares its
//!   income/security-transfer orientation and prefixes its name.
//!
//! A *singular* class may appear on at most one live category.

mod classes;
mod rules;

pub use classes::{CashClass, DepositClass, LoanClass, TransactionClass};
pub use rules::{default_values, validate_category, CategoryDefaults};

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Families of category types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFamily {
    /// Deposit account categories.
    Deposit,
    /// Cash account categories.
    Cash,
    /// Loan account categories.
    Loan,
    /// Transaction categories.
    Transaction,
}

impl CategoryFamily {
    /// Every family.
    pub const ALL: [CategoryFamily; 4] = [Self::Deposit, Self::Cash, Self::Loan, Self::Transaction];

    /// Returns every class of the family.
    #[must_use]
    pub fn classes(self) -> Vec<CategoryClass> {
        match self {
            Self::Deposit => DepositClass::ALL.iter().map(|c| CategoryClass::Deposit(*c)).collect(),
            Self::Cash => CashClass::ALL.iter().map(|c| CategoryClass::Cash(*c)).collect(),
            Self::Loan => LoanClass::ALL.iter().map(|c| CategoryClass::Loan(*c)).collect(),
            Self::Transaction => TransactionClass::ALL
                .iter()
                .map(|c| CategoryClass::Transaction(*c))
                .collect(),
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Deposit => "deposit class",
            Self::Cash => "cash class",
            Self::Loan => "loan class",
            Self::Transaction => "transaction class",
        }
    }
}

/// Rules shared by the class enumerations of every family.
pub trait ClassRules: Copy + Eq + fmt::Debug + 'static {
    /// The family the classes belong to.
    const FAMILY: CategoryFamily;

    /// Every class of the family.
    const ALL: &'static [Self];

    /// Stable numeric id of the class.
    fn id(self) -> u32;

    /// Looks up a class by id.
    fn from_id(id: u32) -> CoreResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|class| class.id() == id)
            .ok_or_else(|| CoreError::unknown_class(Self::FAMILY.name(), id))
    }

    /// At most one live category may carry the class.
    fn is_singular(self) -> bool {
        false
    }

    /// Root class that takes no parent.
    fn is_totals(self) -> bool;

    /// Class that must sit directly below a totals category.
    fn is_subtotals(self) -> bool {
        false
    }

    /// Class of an income category.
    fn is_income(self) -> bool {
        false
    }

    /// Class of a security transfer category.
    fn is_security_transfer(self) -> bool {
        false
    }

    /// Class usable as the target of automatic expenses.
    fn is_expense(self) -> bool {
        false
    }

    /// Returns true if a category of this class may parent `child`.
    fn can_parent_child(self, child: Self) -> bool;

    /// Returns true if a category of this class may parent anything.
    fn can_parent(self) -> bool {
        Self::ALL.iter().any(|child| self.can_parent_child(*child))
    }

    /// Class given to a new category below a parent of class `parent`.
    fn default_child(parent: Option<Self>) -> Self;

    /// Key of the display name in the resource table.
    fn resource_key(self) -> &'static str;
}

/// A class of any family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryClass {
    /// Deposit class.
    Deposit(DepositClass),
    /// Cash class.
    Cash(CashClass),
    /// Loan class.
    Loan(LoanClass),
    /// Transaction class.
    Transaction(TransactionClass),
}

macro_rules! dispatch {
    ($self:expr, $class:ident => $body:expr) => {
        match $self {
            CategoryClass::Deposit($class) => $body,
            CategoryClass::Cash($class) => $body,
            CategoryClass::Loan($class) => $body,
            CategoryClass::Transaction($class) => $body,
        }
    };
}

impl CategoryClass {
    /// Looks up a class of a family by id.
    pub fn from_id(family: CategoryFamily, id: u32) -> CoreResult<Self> {
        Ok(match family {
            CategoryFamily::Deposit => Self::Deposit(DepositClass::from_id(id)?),
            CategoryFamily::Cash => Self::Cash(CashClass::from_id(id)?),
            CategoryFamily::Loan => Self::Loan(LoanClass::from_id(id)?),
            CategoryFamily::Transaction => Self::Transaction(TransactionClass::from_id(id)?),
        })
    }

    /// Returns the family of the class.
    #[must_use]
    pub fn family(self) -> CategoryFamily {
        match self {
            Self::Deposit(_) => CategoryFamily::Deposit,
            Self::Cash(_) => CategoryFamily::Cash,
            Self::Loan(_) => CategoryFamily::Loan,
            Self::Transaction(_) => CategoryFamily::Transaction,
        }
    }

    /// Stable numeric id within the family.
    #[must_use]
    pub fn id(self) -> u32 {
        dispatch!(self, c => c.id())
    }

    /// See [`ClassRules::is_singular`].
    #[must_use]
    pub fn is_singular(self) -> bool {
        dispatch!(self, c => c.is_singular())
    }

    /// See [`ClassRules::is_totals`].
    #[must_use]
    pub fn is_totals(self) -> bool {
        dispatch!(self, c => c.is_totals())
    }

    /// See [`ClassRules::is_subtotals`].
    #[must_use]
    pub fn is_subtotals(self) -> bool {
        dispatch!(self, c => c.is_subtotals())
    }

    /// See [`ClassRules::is_income`].
    #[must_use]
    pub fn is_income(self) -> bool {
        dispatch!(self, c => c.is_income())
    }

    /// See [`ClassRules::is_security_transfer`].
    #[must_use]
    pub fn is_security_transfer(self) -> bool {
        dispatch!(self, c => c.is_security_transfer())
    }

    /// See [`ClassRules::is_expense`].
    #[must_use]
    pub fn is_expense(self) -> bool {
        dispatch!(self, c => c.is_expense())
    }

    /// See [`ClassRules::can_parent`].
    #[must_use]
    pub fn can_parent(self) -> bool {
        dispatch!(self, c => c.can_parent())
    }

    /// Returns true if a category of this class may parent `child`.
    ///
    /// Classes of different families never parent each other.
    #[must_use]
    pub fn can_parent_child(self, child: CategoryClass) -> bool {
        match (self, child) {
            (Self::Deposit(p), Self::Deposit(c)) => p.can_parent_child(c),
            (Self::Cash(p), Self::Cash(c)) => p.can_parent_child(c),
            (Self::Loan(p), Self::Loan(c)) => p.can_parent_child(c),
            (Self::Transaction(p), Self::Transaction(c)) => p.can_parent_child(c),
            _ => false,
        }
    }

    /// Returns true if both classes have the same income and security
    /// transfer orientation.
    #[must_use]
    pub fn same_orientation(self, other: CategoryClass) -> bool {
        self.is_income() == other.is_income()
            && self.is_security_transfer() == other.is_security_transfer()
    }

    /// Class given to a new category of `family` below a parent of class
    /// `parent`.
    #[must_use]
    pub fn default_child(family: CategoryFamily, parent: Option<CategoryClass>) -> Self {
        match family {
            CategoryFamily::Deposit => Self::Deposit(DepositClass::default_child(
                parent.and_then(|p| match p {
                    Self::Deposit(c) => Some(c),
                    _ => None,
                }),
            )),
            CategoryFamily::Cash => Self::Cash(CashClass::default_child(parent.and_then(
                |p| match p {
                    Self::Cash(c) => Some(c),
                    _ => None,
                },
            ))),
            CategoryFamily::Loan => Self::Loan(LoanClass::default_child(parent.and_then(
                |p| match p {
                    Self::Loan(c) => Some(c),
                    _ => None,
                },
            ))),
            CategoryFamily::Transaction => Self::Transaction(TransactionClass::default_child(
                parent.and_then(|p| match p {
                    Self::Transaction(c) => Some(c),
                    _ => None,
                }),
            )),
        }
    }

    /// Key of the display name in the resource table.
    #[must_use]
    pub fn resource_key(self) -> &'static str {
        dispatch!(self, c => c.resource_key())
    }
}

impl fmt::Display for CategoryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, c => write!(f, "{c:?}"))
    }
}
