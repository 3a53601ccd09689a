//! Ledger configuration.

use crate::value::TextLimit;

/// Limits and conventions applied while validating and defaulting items.
///
/// Built once at startup and shared through an `Arc` by every data set and
/// edit session derived from it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Separator between a parent category name and a subcategory name.
    pub name_separator: String,

    /// Maximum length of an item name.
    pub max_name_len: usize,

    /// Maximum length of an item description.
    pub max_desc_len: usize,

    /// Maximum length of notes attributes.
    pub max_notes_len: usize,

    /// Maximum length of short text attributes (sort code, account, ...).
    pub max_short_len: usize,

    /// Maximum length of web-site attributes.
    pub max_web_len: usize,

    /// Base name for generated subcategories.
    pub new_category_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name_separator: ":".to_string(),
            max_name_len: 30,
            max_desc_len: 50,
            max_notes_len: 500,
            max_short_len: 20,
            max_web_len: 50,
            new_category_base: "NewCategory".to_string(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the category name separator.
    #[must_use]
    pub fn name_separator(mut self, separator: impl Into<String>) -> Self {
        self.name_separator = separator.into();
        self
    }

    /// Sets the maximum name length.
    #[must_use]
    pub const fn max_name_len(mut self, len: usize) -> Self {
        self.max_name_len = len;
        self
    }

    /// Sets the maximum description length.
    #[must_use]
    pub const fn max_desc_len(mut self, len: usize) -> Self {
        self.max_desc_len = len;
        self
    }

    /// Sets the maximum notes length.
    #[must_use]
    pub const fn max_notes_len(mut self, len: usize) -> Self {
        self.max_notes_len = len;
        self
    }

    /// Sets the maximum short text length.
    #[must_use]
    pub const fn max_short_len(mut self, len: usize) -> Self {
        self.max_short_len = len;
        self
    }

    /// Sets the maximum web-site length.
    #[must_use]
    pub const fn max_web_len(mut self, len: usize) -> Self {
        self.max_web_len = len;
        self
    }

    /// Sets the base name for generated subcategories.
    #[must_use]
    pub fn new_category_base(mut self, base: impl Into<String>) -> Self {
        self.new_category_base = base.into();
        self
    }

    /// Returns the character limit for a text field class.
    #[must_use]
    pub fn max_len(&self, limit: TextLimit) -> usize {
        match limit {
            TextLimit::Name => self.max_name_len,
            TextLimit::Description => self.max_desc_len,
            TextLimit::Notes => self.max_notes_len,
            TextLimit::Short => self.max_short_len,
            TextLimit::Web => self.max_web_len,
        }
    }

    /// Joins a parent name and a subcategory name.
    #[must_use]
    pub fn subcategory_name(&self, parent: &str, sub: &str) -> String {
        format!("{parent}{}{sub}", self.name_separator)
    }
}
