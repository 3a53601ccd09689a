//! Requirement tables per owner type.
//!
//! Each owner type has a fixed table with one rule per attribute class. A
//! rule computes the requirement from the owner's current category class
//! only.

use crate::category::{CashClass, CategoryClass};
use crate::info::InfoClass;
use crate::types::ItemType;
use std::fmt;

/// Whether an attribute may or must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// The attribute must be absent.
    NotAllowed,
    /// The attribute may be present.
    CanExist,
    /// The attribute must be present.
    MustExist,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotAllowed => "not allowed",
            Self::CanExist => "optional",
            Self::MustExist => "required",
        };
        f.write_str(name)
    }
}

type Rule = fn(Option<CategoryClass>) -> Requirement;

struct ClassPolicy {
    class: InfoClass,
    rule: Rule,
}

const fn policy(class: InfoClass, rule: Rule) -> ClassPolicy {
    ClassPolicy { class, rule }
}

fn optional(_: Option<CategoryClass>) -> Requirement {
    Requirement::CanExist
}

fn is_auto_expense(class: Option<CategoryClass>) -> bool {
    class == Some(CategoryClass::Cash(CashClass::AutoExpense))
}

fn cash_auto(class: Option<CategoryClass>) -> Requirement {
    if is_auto_expense(class) {
        Requirement::MustExist
    } else {
        Requirement::NotAllowed
    }
}

fn cash_manual(class: Option<CategoryClass>) -> Requirement {
    if is_auto_expense(class) {
        Requirement::NotAllowed
    } else {
        Requirement::CanExist
    }
}

fn deposit_maturity(class: Option<CategoryClass>) -> Requirement {
    match class {
        Some(CategoryClass::Deposit(class)) if class.has_maturity() => Requirement::MustExist,
        _ => Requirement::NotAllowed,
    }
}

const CASH_POLICY: [ClassPolicy; 7] = [
    policy(InfoClass::OpeningBalance, cash_manual),
    policy(InfoClass::Notes, optional),
    policy(InfoClass::SortCode, cash_manual),
    policy(InfoClass::Account, cash_manual),
    policy(InfoClass::Reference, cash_manual),
    policy(InfoClass::AutoExpense, cash_auto),
    policy(InfoClass::AutoPayee, cash_auto),
];

const DEPOSIT_POLICY: [ClassPolicy; 10] = [
    policy(InfoClass::OpeningBalance, optional),
    policy(InfoClass::Notes, optional),
    policy(InfoClass::SortCode, optional),
    policy(InfoClass::Account, optional),
    policy(InfoClass::Reference, optional),
    policy(InfoClass::WebSite, optional),
    policy(InfoClass::CustomerNo, optional),
    policy(InfoClass::UserId, optional),
    policy(InfoClass::Password, optional),
    policy(InfoClass::Maturity, deposit_maturity),
];

const LOAN_POLICY: [ClassPolicy; 9] = [
    policy(InfoClass::OpeningBalance, optional),
    policy(InfoClass::Notes, optional),
    policy(InfoClass::SortCode, optional),
    policy(InfoClass::Account, optional),
    policy(InfoClass::Reference, optional),
    policy(InfoClass::WebSite, optional),
    policy(InfoClass::CustomerNo, optional),
    policy(InfoClass::UserId, optional),
    policy(InfoClass::Password, optional),
];

fn table(owner: ItemType) -> &'static [ClassPolicy] {
    match owner {
        ItemType::Cash => &CASH_POLICY,
        ItemType::Deposit => &DEPOSIT_POLICY,
        ItemType::Loan => &LOAN_POLICY,
        _ => &[],
    }
}

/// Requirement of an attribute class for an owner of type `owner` whose
/// category has class `category`.
///
/// Classes missing from the owner's table are never allowed.
#[must_use]
pub fn requirement(
    owner: ItemType,
    category: Option<CategoryClass>,
    class: InfoClass,
) -> Requirement {
    table(owner)
        .iter()
        .find(|policy| policy.class == class)
        .map_or(Requirement::NotAllowed, |policy| (policy.rule)(category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::DepositClass;

    fn cash(class: CashClass) -> Option<CategoryClass> {
        Some(CategoryClass::Cash(class))
    }

    #[test]
    fn auto_expense_cash_flips_requirements() {
        let auto = cash(CashClass::AutoExpense);
        let manual = cash(CashClass::Cash);

        assert_eq!(
            requirement(ItemType::Cash, auto, InfoClass::AutoPayee),
            Requirement::MustExist
        );
        assert_eq!(
            requirement(ItemType::Cash, auto, InfoClass::SortCode),
            Requirement::NotAllowed
        );
        assert_eq!(
            requirement(ItemType::Cash, manual, InfoClass::AutoPayee),
            Requirement::NotAllowed
        );
        assert_eq!(
            requirement(ItemType::Cash, manual, InfoClass::SortCode),
            Requirement::CanExist
        );
        assert_eq!(
            requirement(ItemType::Cash, auto, InfoClass::Notes),
            Requirement::CanExist
        );
    }

    #[test]
    fn unlisted_classes_are_not_allowed() {
        assert_eq!(
            requirement(ItemType::Cash, cash(CashClass::Cash), InfoClass::Password),
            Requirement::NotAllowed
        );
        assert_eq!(
            requirement(ItemType::Loan, None, InfoClass::Maturity),
            Requirement::NotAllowed
        );
        assert_eq!(
            requirement(ItemType::Payee, None, InfoClass::Notes),
            Requirement::NotAllowed
        );
    }

    #[test]
    fn bonds_need_maturity() {
        let bond = Some(CategoryClass::Deposit(DepositClass::Bond));
        let savings = Some(CategoryClass::Deposit(DepositClass::Savings));
        assert_eq!(
            requirement(ItemType::Deposit, bond, InfoClass::Maturity),
            Requirement::MustExist
        );
        assert_eq!(
            requirement(ItemType::Deposit, savings, InfoClass::Maturity),
            Requirement::NotAllowed
        );
    }
}
