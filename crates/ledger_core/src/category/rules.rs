//! Hierarchy validation and defaulting of categories.

use crate::category::CategoryClass;
use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::resolve::Resolver;
use crate::types::{ItemId, ItemType};
use crate::validation::{ValidationErrors, ValidationFailure};
use crate::value::FieldId;

/// Validates the type and parent of a live category.
///
/// Checks run in order: the type row must exist and be enabled, a singular
/// class must be used exactly once, and then the parent rules of the class
/// apply. A broken type stops the checks that depend on it.
pub fn validate_category(resolver: &dyn Resolver, item: &Entity, errors: &mut ValidationErrors) {
    let Some(family) = item.item_type().category_family() else {
        return;
    };
    let Some(type_id) = item.category_type() else {
        // Reported as missing by the field checks.
        return;
    };
    let Some(row) = resolver.statics().row(family, type_id) else {
        errors.add(FieldId::CategoryType, ValidationFailure::UnknownType);
        return;
    };
    if !row.enabled {
        errors.add(FieldId::CategoryType, ValidationFailure::DisabledType);
    }

    let class = row.class;
    if class.is_singular() {
        let count = resolver
            .list(item.item_type())
            .map_or(0, |list| list.class_count(class));
        if count > 1 {
            errors.add(FieldId::CategoryType, ValidationFailure::MultipleInstances);
        }
    }

    let parent = item
        .link(FieldId::Parent)
        .and_then(|link| resolver.target(link));
    let parent_class = parent.and_then(|parent| resolver.class_of(parent));

    if class.is_totals() {
        if item.link(FieldId::Parent).is_some() {
            errors.add(FieldId::Parent, ValidationFailure::NotAllowed);
        }
        return;
    }

    let Some(parent) = parent else {
        errors.add(FieldId::Parent, ValidationFailure::Missing);
        return;
    };

    if class.is_subtotals() {
        if !parent_class.is_some_and(CategoryClass::is_totals) {
            errors.add(FieldId::Parent, ValidationFailure::InvalidParent);
        }
        return;
    }

    match parent_class {
        Some(parent_class)
            if parent_class.can_parent_child(class) && parent_class.same_orientation(class) => {}
        _ => errors.add(FieldId::Parent, ValidationFailure::InvalidParent),
    }

    if let (Some(name), Some(parent_name)) = (item.name(), parent.name()) {
        let prefix = resolver.config().subcategory_name(parent_name, "");
        let matches = name
            .strip_prefix(&prefix)
            .is_some_and(|sub| !sub.is_empty());
        if !matches {
            errors.add(FieldId::Name, ValidationFailure::NameMismatch);
        }
    }
}

/// Initial values for a new category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDefaults {
    /// Row id of the default type.
    pub category_type: u32,
    /// List-unique generated name.
    pub name: String,
    /// The parent, if any.
    pub parent: Option<ItemId>,
}

/// Derives the type and name of a new category below `parent`.
///
/// The type follows the parent's class (totals give expense totals, income
/// totals give taxed income, the security parent gives stock split, and
/// anything else gives expense). The name is the parent name, the separator
/// and the configured base, made unique within the list.
///
/// # Errors
///
/// Fails if the type is not a category type, the parent is missing, or no
/// enabled row exists for the default class.
pub fn default_values(
    resolver: &dyn Resolver,
    item_type: ItemType,
    parent: Option<ItemId>,
) -> CoreResult<CategoryDefaults> {
    let family = item_type.category_family().ok_or_else(|| {
        CoreError::invalid_operation(format!("{item_type} is not a category type"))
    })?;
    let list = resolver
        .list(item_type)
        .ok_or_else(|| CoreError::missing_list(item_type))?;

    let parent_item = parent
        .map(|id| {
            resolver
                .lookup(item_type, id)
                .ok_or_else(|| CoreError::item_not_found(item_type, id))
        })
        .transpose()?;
    let parent_class = parent_item.and_then(|parent| resolver.class_of(parent));

    let class = CategoryClass::default_child(family, parent_class);
    let row = resolver.statics().row_for_class(class).ok_or_else(|| {
        CoreError::invalid_operation(format!("no enabled category type for {class}"))
    })?;

    let base = &resolver.config().new_category_base;
    let stem = match parent_item.and_then(Entity::name) {
        Some(parent_name) => resolver.config().subcategory_name(parent_name, base),
        None => base.clone(),
    };

    Ok(CategoryDefaults {
        category_type: row.id,
        name: list.unique_name(&stem),
        parent,
    })
}
