//! Field identifiers and the per-type field registry.
//!
//! Every item type declares its fields in a fixed table built at compile
//! time. The values constructor, the checked setter and `apply_changes` all
//! consult these tables instead of per-type code.

use crate::types::ItemType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a field of an item.
///
/// The attribute variants (`OpeningBalance` onwards) are never stored on an
/// owner directly; they address the owner's attribute set through the
/// class/field map in [`InfoClass`](crate::InfoClass).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    /// Item name.
    Name,
    /// Free text description.
    Description,
    /// Row of the static category type table.
    CategoryType,
    /// Parent item.
    Parent,
    /// Category classifying an account.
    Category,
    /// Account currency.
    Currency,
    /// Closed flag.
    Closed,
    /// Owner of an attribute record.
    Owner,
    /// Attribute class of an attribute record.
    InfoClass,
    /// Value of an attribute record.
    Value,
    /// Opening balance attribute.
    OpeningBalance,
    /// Notes attribute.
    Notes,
    /// Sort code attribute.
    SortCode,
    /// Account number attribute.
    Account,
    /// Reference attribute.
    Reference,
    /// Web-site attribute.
    WebSite,
    /// Customer number attribute.
    CustomerNo,
    /// User id attribute.
    UserId,
    /// Password attribute.
    Password,
    /// Maturity date attribute.
    Maturity,
    /// Auto-expense category attribute.
    AutoExpense,
    /// Auto-expense payee attribute.
    AutoPayee,
}

impl FieldId {
    /// Returns the field name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Description => "Description",
            Self::CategoryType => "CategoryType",
            Self::Parent => "Parent",
            Self::Category => "Category",
            Self::Currency => "Currency",
            Self::Closed => "Closed",
            Self::Owner => "Owner",
            Self::InfoClass => "InfoClass",
            Self::Value => "Value",
            Self::OpeningBalance => "OpeningBalance",
            Self::Notes => "Notes",
            Self::SortCode => "SortCode",
            Self::Account => "Account",
            Self::Reference => "Reference",
            Self::WebSite => "WebSite",
            Self::CustomerNo => "CustomerNo",
            Self::UserId => "UserId",
            Self::Password => "Password",
            Self::Maturity => "Maturity",
            Self::AutoExpense => "AutoExpense",
            Self::AutoPayee => "AutoPayee",
        }
    }

    /// Stable one-byte tag, used as associated data when sealing.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Text limit class, mapped to a length by [`Config`](crate::Config).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextLimit {
    /// Item names.
    Name,
    /// Descriptions.
    Description,
    /// Notes.
    Notes,
    /// Short codes and numbers.
    Short,
    /// Web addresses.
    Web,
}

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Boolean flag.
    Bool,
    /// Plain integer.
    Integer,
    /// Text bounded by a limit.
    Text(TextLimit),
    /// Money amount.
    Money,
    /// Calendar date.
    Date,
    /// Currency code.
    Currency,
    /// Id of a static category type row.
    StaticRef,
    /// Id of an attribute class.
    InfoClass,
    /// Reference to an item of the given type.
    Link(ItemType),
    /// Value whose kind is fixed by the record's attribute class.
    InfoValue,
}

/// Declaration of one field of an item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// The field.
    pub id: FieldId,
    /// The kind of value held.
    pub kind: FieldKind,
    /// Whether the value is stored sealed.
    pub encrypted: bool,
    /// Whether `apply_changes` copies the field.
    pub editable: bool,
    /// Whether validation requires a value.
    pub required: bool,
}

impl FieldSpec {
    const fn new(id: FieldId, kind: FieldKind) -> Self {
        Self {
            id,
            kind,
            encrypted: false,
            editable: true,
            required: false,
        }
    }

    const fn encrypted(mut self) -> Self {
        self.encrypted = true;
        self
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn fixed(mut self) -> Self {
        self.editable = false;
        self
    }
}

const fn name_field() -> FieldSpec {
    FieldSpec::new(FieldId::Name, FieldKind::Text(TextLimit::Name))
        .encrypted()
        .required()
}

const fn description_field() -> FieldSpec {
    FieldSpec::new(FieldId::Description, FieldKind::Text(TextLimit::Description)).encrypted()
}

const fn category_fields(item_type: ItemType) -> [FieldSpec; 4] {
    [
        name_field(),
        description_field(),
        FieldSpec::new(FieldId::CategoryType, FieldKind::StaticRef).required(),
        FieldSpec::new(FieldId::Parent, FieldKind::Link(item_type)),
    ]
}

const fn cash_fields() -> [FieldSpec; 5] {
    [
        name_field(),
        description_field(),
        FieldSpec::new(FieldId::Category, FieldKind::Link(ItemType::CashCategory)).required(),
        FieldSpec::new(FieldId::Currency, FieldKind::Currency).required(),
        FieldSpec::new(FieldId::Closed, FieldKind::Bool),
    ]
}

const fn held_account_fields(category: ItemType) -> [FieldSpec; 6] {
    [
        name_field(),
        description_field(),
        FieldSpec::new(FieldId::Category, FieldKind::Link(category)).required(),
        FieldSpec::new(FieldId::Parent, FieldKind::Link(ItemType::Payee)).required(),
        FieldSpec::new(FieldId::Currency, FieldKind::Currency).required(),
        FieldSpec::new(FieldId::Closed, FieldKind::Bool),
    ]
}

const fn info_fields(owner: ItemType) -> [FieldSpec; 3] {
    [
        FieldSpec::new(FieldId::Owner, FieldKind::Link(owner))
            .required()
            .fixed(),
        FieldSpec::new(FieldId::InfoClass, FieldKind::InfoClass)
            .required()
            .fixed(),
        FieldSpec::new(FieldId::Value, FieldKind::InfoValue).required(),
    ]
}

const DEPOSIT_CATEGORY_FIELDS: [FieldSpec; 4] = category_fields(ItemType::DepositCategory);
const CASH_CATEGORY_FIELDS: [FieldSpec; 4] = category_fields(ItemType::CashCategory);
const LOAN_CATEGORY_FIELDS: [FieldSpec; 4] = category_fields(ItemType::LoanCategory);
const TRANSACTION_CATEGORY_FIELDS: [FieldSpec; 4] =
    category_fields(ItemType::TransactionCategory);
const PAYEE_FIELDS: [FieldSpec; 3] = [
    name_field(),
    description_field(),
    FieldSpec::new(FieldId::Closed, FieldKind::Bool),
];
const DEPOSIT_FIELDS: [FieldSpec; 6] = held_account_fields(ItemType::DepositCategory);
const CASH_FIELDS: [FieldSpec; 5] = cash_fields();
const LOAN_FIELDS: [FieldSpec; 6] = held_account_fields(ItemType::LoanCategory);
const DEPOSIT_INFO_FIELDS: [FieldSpec; 3] = info_fields(ItemType::Deposit);
const CASH_INFO_FIELDS: [FieldSpec; 3] = info_fields(ItemType::Cash);
const LOAN_INFO_FIELDS: [FieldSpec; 3] = info_fields(ItemType::Loan);

impl ItemType {
    /// Returns the field table of this item type.
    #[must_use]
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::DepositCategory => &DEPOSIT_CATEGORY_FIELDS,
            Self::CashCategory => &CASH_CATEGORY_FIELDS,
            Self::LoanCategory => &LOAN_CATEGORY_FIELDS,
            Self::TransactionCategory => &TRANSACTION_CATEGORY_FIELDS,
            Self::Payee => &PAYEE_FIELDS,
            Self::Deposit => &DEPOSIT_FIELDS,
            Self::Cash => &CASH_FIELDS,
            Self::Loan => &LOAN_FIELDS,
            Self::DepositInfo => &DEPOSIT_INFO_FIELDS,
            Self::CashInfo => &CASH_INFO_FIELDS,
            Self::LoanInfo => &LOAN_INFO_FIELDS,
        }
    }

    /// Looks up the declaration of a field.
    #[must_use]
    pub fn field_spec(self, field: FieldId) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|spec| spec.id == field)
    }

    /// Iterates the link fields of this item type.
    pub fn link_fields(self) -> impl Iterator<Item = (FieldId, ItemType)> {
        self.fields().iter().filter_map(|spec| match spec.kind {
            FieldKind::Link(target) => Some((spec.id, target)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_declares_fields_once() {
        for item_type in ItemType::ALL {
            let fields = item_type.fields();
            for (i, spec) in fields.iter().enumerate() {
                assert!(
                    !fields[i + 1..].iter().any(|other| other.id == spec.id),
                    "{item_type} declares {} twice",
                    spec.id
                );
            }
        }
    }

    #[test]
    fn category_parent_targets_same_type() {
        for item_type in ItemType::ALL.into_iter().filter(|t| t.is_category()) {
            let parent = item_type.field_spec(FieldId::Parent).unwrap();
            assert_eq!(parent.kind, FieldKind::Link(item_type));
        }
    }

    #[test]
    fn links_never_point_forward() {
        for item_type in ItemType::ALL {
            for (field, target) in item_type.link_fields() {
                assert!(target <= item_type, "{item_type}.{field} -> {target}");
            }
        }
    }

    #[test]
    fn info_structure_is_not_editable() {
        let owner = ItemType::CashInfo.field_spec(FieldId::Owner).unwrap();
        assert!(!owner.editable);
        let value = ItemType::CashInfo.field_spec(FieldId::Value).unwrap();
        assert!(value.editable);
    }

    #[test]
    fn names_are_sealed() {
        assert!(ItemType::Payee.field_spec(FieldId::Name).unwrap().encrypted);
        assert!(!ItemType::Payee.field_spec(FieldId::Closed).unwrap().encrypted);
    }
}
