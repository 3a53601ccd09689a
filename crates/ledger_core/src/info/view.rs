//! Read access and validation of an owner's attributes.

use crate::category::CategoryClass;
use crate::entity::Entity;
use crate::info::{requirement, InfoClass, Requirement};
use crate::resolve::Resolver;
use crate::types::{ItemType, Money};
use crate::validation::{ValidationErrors, ValidationFailure};
use crate::value::{FieldId, FieldKind, FieldValue};
use chrono::NaiveDate;

/// An owner item seen together with the lists holding its attribute
/// records.
#[derive(Clone, Copy)]
pub struct InfoView<'a> {
    resolver: &'a dyn Resolver,
    owner: &'a Entity,
}

impl<'a> InfoView<'a> {
    /// Creates a view of `owner` through `resolver`.
    #[must_use]
    pub fn new(resolver: &'a dyn Resolver, owner: &'a Entity) -> Self {
        Self { resolver, owner }
    }

    /// Returns the owner.
    #[must_use]
    pub fn owner(&self) -> &'a Entity {
        self.owner
    }

    /// Class of the owner's current category.
    #[must_use]
    pub fn category_class(&self) -> Option<CategoryClass> {
        let category = self
            .owner
            .link(FieldId::Category)
            .and_then(|link| self.resolver.target(link))?;
        self.resolver.class_of(category)
    }

    /// Whether the owner may or must carry an attribute of `class`.
    #[must_use]
    pub fn is_class_required(&self, class: InfoClass) -> Requirement {
        requirement(self.owner.item_type(), self.category_class(), class)
    }

    /// Returns the live record of a class.
    #[must_use]
    pub fn record(&self, class: InfoClass) -> Option<&'a Entity> {
        let info_type = self.owner.item_type().info_type()?;
        let id = self.owner.attributes()?.get(class)?;
        self.resolver.lookup(info_type, id)
    }

    /// Returns the value of a class.
    #[must_use]
    pub fn value(&self, class: InfoClass) -> Option<&'a FieldValue> {
        self.record(class)?.value(FieldId::Value)
    }

    /// Reads a field of the owner, looking attribute fields up through the
    /// class/field map.
    #[must_use]
    pub fn field_value(&self, field: FieldId) -> Option<&'a FieldValue> {
        if self.owner.item_type().field_spec(field).is_some() {
            return self.owner.value(field);
        }
        InfoClass::from_field(field).and_then(|class| self.value(class))
    }

    /// Classes with a live record, in class order.
    #[must_use]
    pub fn present_classes(&self) -> Vec<InfoClass> {
        InfoClass::ALL
            .into_iter()
            .filter(|class| self.record(*class).is_some())
            .collect()
    }

    /// Opening balance of the account.
    #[must_use]
    pub fn opening_balance(&self) -> Option<&'a Money> {
        self.value(InfoClass::OpeningBalance)?.as_money()
    }

    /// Notes of the account.
    #[must_use]
    pub fn notes(&self) -> Option<&'a str> {
        self.value(InfoClass::Notes)?.as_text()
    }

    /// Maturity date of a fixed-term deposit.
    #[must_use]
    pub fn maturity(&self) -> Option<NaiveDate> {
        self.value(InfoClass::Maturity)?.as_date()
    }

    /// Expense category of an auto-expense cash account.
    #[must_use]
    pub fn auto_expense(&self) -> Option<&'a Entity> {
        self.linked(InfoClass::AutoExpense)
    }

    /// Payee of an auto-expense cash account.
    #[must_use]
    pub fn auto_payee(&self) -> Option<&'a Entity> {
        self.linked(InfoClass::AutoPayee)
    }

    fn linked(&self, class: InfoClass) -> Option<&'a Entity> {
        let link = self.value(class)?.as_link()?;
        self.resolver.target(link)
    }

    /// Checks every attribute class against the owner's requirements and
    /// the class's own rules, recording failures against the class's field.
    pub fn validate(&self, errors: &mut ValidationErrors) {
        let category = self.category_class();
        for class in InfoClass::ALL {
            let field = class.field_id();
            let value = self.value(class);
            match (requirement(self.owner.item_type(), category, class), value) {
                (Requirement::NotAllowed, Some(_)) => {
                    errors.add(field, ValidationFailure::NotAllowed);
                }
                (Requirement::MustExist, None) => errors.add(field, ValidationFailure::Missing),
                (_, Some(value)) => self.check_value(class, value, errors),
                (_, None) => {}
            }
        }
    }

    fn check_value(&self, class: InfoClass, value: &FieldValue, errors: &mut ValidationErrors) {
        let field = class.field_id();
        if let (FieldKind::Text(limit), Some(text)) = (class.kind(), value.as_text()) {
            let max = self.resolver.config().max_len(limit);
            if text.chars().count() > max {
                errors.add(field, ValidationFailure::TooLong { max });
            }
        }

        match class {
            InfoClass::OpeningBalance => {
                let mismatch = value
                    .as_money()
                    .zip(self.owner.currency())
                    .is_some_and(|(money, currency)| money.currency != *currency);
                if mismatch {
                    errors.add(field, ValidationFailure::CurrencyMismatch);
                }
            }
            InfoClass::AutoExpense => match self.auto_expense() {
                Some(category) => {
                    let suitable = self
                        .resolver
                        .class_of(category)
                        .is_some_and(|class| class.is_expense() && !class.can_parent());
                    if !suitable {
                        errors.add(field, ValidationFailure::InvalidCategory);
                    }
                }
                None => errors.add(field, ValidationFailure::Missing),
            },
            InfoClass::AutoPayee => match self.auto_payee() {
                Some(payee) if payee.is_closed() && !self.owner.is_closed() => {
                    errors.add(field, ValidationFailure::ClosedLink);
                }
                Some(_) => {}
                None => errors.add(field, ValidationFailure::Missing),
            },
            _ => {}
        }
    }

    /// Default value for a class the owner newly requires.
    ///
    /// The first suitable candidate in list order wins: the first live
    /// expense category for auto-expense, the first live open payee for
    /// auto-payee. Other classes have no default.
    #[must_use]
    pub fn default_value(&self, class: InfoClass) -> Option<FieldValue> {
        match class {
            InfoClass::AutoExpense => self
                .resolver
                .list(ItemType::TransactionCategory)?
                .iter()
                .find(|category| {
                    self.resolver
                        .class_of(category)
                        .is_some_and(|class| class.is_expense() && !class.can_parent())
                })
                .map(|category| FieldValue::link(category.item_type(), category.id())),
            InfoClass::AutoPayee => self
                .resolver
                .list(ItemType::Payee)?
                .iter()
                .find(|payee| !payee.is_closed())
                .map(|payee| FieldValue::link(payee.item_type(), payee.id())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for InfoView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfoView")
            .field("owner_type", &self.owner.item_type())
            .field("owner", &self.owner.id())
            .finish_non_exhaustive()
    }
}
