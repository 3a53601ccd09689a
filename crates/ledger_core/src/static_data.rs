//! Static category type tables and display-name resources.
//!
//! Built once at startup and shared read-only through an `Arc`. Tests build
//! their own tables with [`StaticData::empty`] and the `with_*` builders.

use crate::category::{CategoryClass, CategoryFamily};
use std::collections::{BTreeMap, HashMap};

/// One row of a category type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTypeRow {
    /// Row id, stored in a category's `CategoryType` field.
    pub id: u32,
    /// Class the row stands for.
    pub class: CategoryClass,
    /// Disabled rows may not be used by live categories.
    pub enabled: bool,
}

/// Category type tables per family plus the resource lookup table.
#[derive(Debug, Clone, Default)]
pub struct StaticData {
    tables: BTreeMap<CategoryFamily, Vec<CategoryTypeRow>>,
    resources: HashMap<String, String>,
}

impl StaticData {
    /// Creates empty tables.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates one enabled row per class, with the class id as row id, and
    /// English display names.
    #[must_use]
    pub fn standard() -> Self {
        let mut data = Self::empty();
        for family in CategoryFamily::ALL {
            for class in family.classes() {
                data = data
                    .with_row(CategoryTypeRow {
                        id: class.id(),
                        class,
                        enabled: true,
                    })
                    .with_resource(class.resource_key(), display_name(class));
            }
        }
        data
    }

    /// Adds a row, replacing any row with the same id in its family.
    #[must_use]
    pub fn with_row(mut self, row: CategoryTypeRow) -> Self {
        let table = self.tables.entry(row.class.family()).or_default();
        table.retain(|existing| existing.id != row.id);
        table.push(row);
        self
    }

    /// Disables every row of a class.
    #[must_use]
    pub fn with_disabled(mut self, class: CategoryClass) -> Self {
        if let Some(table) = self.tables.get_mut(&class.family()) {
            for row in table.iter_mut().filter(|row| row.class == class) {
                row.enabled = false;
            }
        }
        self
    }

    /// Adds a display string.
    #[must_use]
    pub fn with_resource(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.resources.insert(key.into(), text.into());
        self
    }

    /// Looks up a row by id.
    #[must_use]
    pub fn row(&self, family: CategoryFamily, id: u32) -> Option<&CategoryTypeRow> {
        self.tables.get(&family)?.iter().find(|row| row.id == id)
    }

    /// Returns the rows of a family in insertion order.
    #[must_use]
    pub fn rows(&self, family: CategoryFamily) -> &[CategoryTypeRow] {
        self.tables.get(&family).map_or(&[][..], Vec::as_slice)
    }

    /// Returns the first enabled row of a class.
    #[must_use]
    pub fn row_for_class(&self, class: CategoryClass) -> Option<&CategoryTypeRow> {
        self.rows(class.family())
            .iter()
            .find(|row| row.class == class && row.enabled)
    }

    /// Returns the class of a row.
    #[must_use]
    pub fn class_of(&self, family: CategoryFamily, id: u32) -> Option<CategoryClass> {
        self.row(family, id).map(|row| row.class)
    }

    /// Looks up a display string.
    #[must_use]
    pub fn resource(&self, key: &str) -> Option<&str> {
        self.resources.get(key).map(String::as_str)
    }

    /// Display name of a class, falling back to the resource key.
    #[must_use]
    pub fn class_name(&self, class: CategoryClass) -> &str {
        let key = class.resource_key();
        self.resource(key).unwrap_or(key)
    }
}

fn display_name(class: CategoryClass) -> String {
    let debug = class.to_string();
    let mut out = String::with_capacity(debug.len() + 4);
    for (i, ch) in debug.chars().enumerate() {
        if i > 0 && ch.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{CashClass, TransactionClass};

    #[test]
    fn standard_tables_cover_every_class() {
        let data = StaticData::standard();
        for family in CategoryFamily::ALL {
            assert_eq!(data.rows(family).len(), family.classes().len());
        }
        let expense = CategoryClass::Transaction(TransactionClass::Expense);
        assert_eq!(data.row_for_class(expense).unwrap().id, 10);
        assert_eq!(data.class_of(CategoryFamily::Transaction, 10), Some(expense));
    }

    #[test]
    fn display_names() {
        let data = StaticData::standard();
        let class = CategoryClass::Transaction(TransactionClass::TaxedIncome);
        assert_eq!(data.class_name(class), "Taxed Income");

        let empty = StaticData::empty();
        assert_eq!(empty.class_name(class), "TransactionClass.TaxedIncome");
    }

    #[test]
    fn disabled_rows_are_skipped_for_defaults() {
        let auto = CategoryClass::Cash(CashClass::AutoExpense);
        let data = StaticData::standard().with_disabled(auto);
        assert!(data.row_for_class(auto).is_none());
        assert!(!data.row(CategoryFamily::Cash, 2).unwrap().enabled);
    }

    #[test]
    fn with_row_replaces_by_id() {
        let class = CategoryClass::Cash(CashClass::Cash);
        let data = StaticData::empty()
            .with_row(CategoryTypeRow { id: 5, class, enabled: true })
            .with_row(CategoryTypeRow { id: 5, class, enabled: false });
        assert_eq!(data.rows(CategoryFamily::Cash).len(), 1);
        assert!(!data.row(CategoryFamily::Cash, 5).unwrap().enabled);
    }
}
