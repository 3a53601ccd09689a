//! Domain validation.
//!
//! Validation never fails with an `Err`: every broken rule is recorded as a
//! `(field, failure)` pair on the item, and callers inspect
//! [`ValidationErrors::has_errors`] to decide whether a commit may go ahead.

mod errors;

pub use errors::{ValidationErrors, ValidationFailure};

use crate::category::validate_category;
use crate::entity::Entity;
use crate::info::InfoView;
use crate::resolve::Resolver;
use crate::types::ItemType;
use crate::value::{FieldId, FieldKind};

/// Validates one live item against the lists of `resolver`.
///
/// Deleted items are never validated and yield no errors.
#[must_use]
pub fn validate_item(resolver: &dyn Resolver, item: &Entity) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if item.is_deleted() {
        return errors;
    }

    check_fields(resolver, item, &mut errors);
    if item.item_type().is_named() {
        check_name(resolver, item, &mut errors);
    }

    if item.item_type().is_category() {
        validate_category(resolver, item, &mut errors);
    } else if item.item_type().account_category().is_some() {
        check_account(resolver, item, &mut errors);
        InfoView::new(resolver, item).validate(&mut errors);
    }
    errors
}

/// Required fields and text lengths from the field table.
fn check_fields(resolver: &dyn Resolver, item: &Entity, errors: &mut ValidationErrors) {
    let config = resolver.config();
    for spec in item.item_type().fields() {
        match item.value(spec.id) {
            None if spec.required => errors.add(spec.id, ValidationFailure::Missing),
            Some(value) => {
                if let (FieldKind::Text(limit), Some(text)) = (spec.kind, value.as_text()) {
                    let max = config.max_len(limit);
                    if text.chars().count() > max {
                        errors.add(spec.id, ValidationFailure::TooLong { max });
                    }
                }
            }
            None => {}
        }
    }
}

fn check_name(resolver: &dyn Resolver, item: &Entity, errors: &mut ValidationErrors) {
    let Some(name) = item.name() else {
        return;
    };
    if name.trim().is_empty() {
        errors.add(FieldId::Name, ValidationFailure::Missing);
        return;
    }
    let count = resolver
        .list(item.item_type())
        .map_or(0, |list| list.name_count(name));
    if count > 1 {
        errors.add(FieldId::Name, ValidationFailure::DuplicateName);
    }
}

/// Category and holding-institution rules of an account.
fn check_account(resolver: &dyn Resolver, item: &Entity, errors: &mut ValidationErrors) {
    if let Some(category) = item.link(FieldId::Category).and_then(|link| resolver.target(link)) {
        match resolver.class_of(category) {
            Some(class) if class.can_parent() => {
                errors.add(FieldId::Category, ValidationFailure::InvalidCategory);
            }
            None => errors.add(FieldId::Category, ValidationFailure::InvalidCategory),
            Some(_) => {}
        }
    }

    if item.item_type() != ItemType::Cash {
        if let Some(parent) = item.link(FieldId::Parent).and_then(|link| resolver.target(link)) {
            if parent.is_closed() && !item.is_closed() {
                errors.add(FieldId::Parent, ValidationFailure::ClosedLink);
            }
        }
    }
}
