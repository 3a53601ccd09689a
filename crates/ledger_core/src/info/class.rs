//! Attribute classes and their field mapping.

use crate::error::{CoreError, CoreResult};
use crate::types::ItemType;
use crate::value::{FieldId, FieldKind, TextLimit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Class of an optional attribute of an account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InfoClass {
    /// Balance when the account was opened.
    OpeningBalance,
    /// Free text notes.
    Notes,
    /// Bank sort code.
    SortCode,
    /// Account number.
    Account,
    /// Reference.
    Reference,
    /// Web site.
    WebSite,
    /// Customer number.
    CustomerNo,
    /// User id.
    UserId,
    /// Password.
    Password,
    /// Maturity date of a fixed-term deposit.
    Maturity,
    /// Expense category that auto-expense cash is booked against.
    AutoExpense,
    /// Payee that auto-expense cash is paid to.
    AutoPayee,
}

impl InfoClass {
    /// Every class.
    pub const ALL: [InfoClass; 12] = [
        Self::OpeningBalance,
        Self::Notes,
        Self::SortCode,
        Self::Account,
        Self::Reference,
        Self::WebSite,
        Self::CustomerNo,
        Self::UserId,
        Self::Password,
        Self::Maturity,
        Self::AutoExpense,
        Self::AutoPayee,
    ];

    /// Stable numeric id, stored in the `InfoClass` field of a record.
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::OpeningBalance => 1,
            Self::Notes => 2,
            Self::SortCode => 3,
            Self::Account => 4,
            Self::Reference => 5,
            Self::WebSite => 6,
            Self::CustomerNo => 7,
            Self::UserId => 8,
            Self::Password => 9,
            Self::Maturity => 10,
            Self::AutoExpense => 11,
            Self::AutoPayee => 12,
        }
    }

    /// Looks up a class by id.
    pub fn from_id(id: u32) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|class| class.id() == id)
            .ok_or_else(|| CoreError::unknown_class("info class", id))
    }

    /// Field id under which the owner exposes the attribute.
    #[must_use]
    pub const fn field_id(self) -> FieldId {
        match self {
            Self::OpeningBalance => FieldId::OpeningBalance,
            Self::Notes => FieldId::Notes,
            Self::SortCode => FieldId::SortCode,
            Self::Account => FieldId::Account,
            Self::Reference => FieldId::Reference,
            Self::WebSite => FieldId::WebSite,
            Self::CustomerNo => FieldId::CustomerNo,
            Self::UserId => FieldId::UserId,
            Self::Password => FieldId::Password,
            Self::Maturity => FieldId::Maturity,
            Self::AutoExpense => FieldId::AutoExpense,
            Self::AutoPayee => FieldId::AutoPayee,
        }
    }

    /// Inverse of [`field_id`](Self::field_id).
    #[must_use]
    pub fn from_field(field: FieldId) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.field_id() == field)
    }

    /// Kind of value a record of this class holds.
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::OpeningBalance => FieldKind::Money,
            Self::Notes => FieldKind::Text(TextLimit::Notes),
            Self::SortCode
            | Self::Account
            | Self::Reference
            | Self::CustomerNo
            | Self::UserId
            | Self::Password => FieldKind::Text(TextLimit::Short),
            Self::WebSite => FieldKind::Text(TextLimit::Web),
            Self::Maturity => FieldKind::Date,
            Self::AutoExpense => FieldKind::Link(ItemType::TransactionCategory),
            Self::AutoPayee => FieldKind::Link(ItemType::Payee),
        }
    }

    /// Whether the value is stored sealed.
    #[must_use]
    pub const fn encrypted(self) -> bool {
        !matches!(self, Self::Maturity | Self::AutoExpense | Self::AutoPayee)
    }

    /// Key of the display name in the resource table.
    #[must_use]
    pub const fn resource_key(self) -> &'static str {
        match self {
            Self::OpeningBalance => "InfoClass.OpeningBalance",
            Self::Notes => "InfoClass.Notes",
            Self::SortCode => "InfoClass.SortCode",
            Self::Account => "InfoClass.Account",
            Self::Reference => "InfoClass.Reference",
            Self::WebSite => "InfoClass.WebSite",
            Self::CustomerNo => "InfoClass.CustomerNo",
            Self::UserId => "InfoClass.UserId",
            Self::Password => "InfoClass.Password",
            Self::Maturity => "InfoClass.Maturity",
            Self::AutoExpense => "InfoClass.AutoExpense",
            Self::AutoPayee => "InfoClass.AutoPayee",
        }
    }
}

impl fmt::Display for InfoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_id().name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_map_is_bidirectional() {
        for class in InfoClass::ALL {
            assert_eq!(InfoClass::from_field(class.field_id()), Some(class));
            assert_eq!(InfoClass::from_id(class.id()).unwrap(), class);
        }
        assert_eq!(InfoClass::from_field(FieldId::Name), None);
    }

    #[test]
    fn unknown_id() {
        assert!(matches!(
            InfoClass::from_id(0),
            Err(CoreError::UnknownClass { kind: "info class", id: 0 })
        ));
    }

    #[test]
    fn links_are_not_sealed() {
        assert!(!InfoClass::AutoPayee.encrypted());
        assert!(InfoClass::Password.encrypted());
        assert_eq!(
            InfoClass::AutoExpense.kind(),
            FieldKind::Link(ItemType::TransactionCategory)
        );
    }
}
