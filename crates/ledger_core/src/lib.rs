//! # Ledger Core
//!
//! In-memory versioned item framework for a personal-finance ledger.
//!
//! This crate provides:
//! - Versioned items with snapshot history and field-level change detection
//! - Id-indexed lists with incrementally maintained uniqueness indexes
//! - Edit sessions: isolated working copies committed back as a unit
//! - Per-account attribute sets with category-dependent requirements
//! - Category hierarchy rules and defaulting
//! - The 64-bit external id codec
//!
//! ## Design Principles
//!
//! - Items never point at their list; links are resolved through a
//!   [`Resolver`] and remember which style of list they resolved against
//! - Structural problems are [`CoreError`]s; broken domain rules are
//!   accumulated per item as [`ValidationErrors`]
//! - Configuration and static tables are built once and passed in
//!
//! ## Example
//!
//! ```rust
//! use ledger_core::{Config, DataSet, FieldId, FieldValue, ItemId, ItemType, StaticData, ValuesIn};
//!
//! let mut data = DataSet::new(Config::default(), StaticData::standard());
//! let bank = ValuesIn::new(ItemId::new(1)).with(FieldId::Name, FieldValue::text("Bank"));
//! data.add_values_item(ItemType::Payee, &bank).unwrap();
//! data.resolve_data_set_links().unwrap();
//!
//! let mut edits = data.derive_edit_set().unwrap();
//! let renamed = Some(FieldValue::text("High Street Bank"));
//! edits.set_value(ItemType::Payee, ItemId::new(1), FieldId::Name, renamed).unwrap();
//!
//! let summary = data.commit(&mut edits).unwrap();
//! assert_eq!(summary.changed, 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod category;
mod config;
pub mod crypto;
mod dataset;
mod entity;
mod error;
mod history;
pub mod index;
mod info;
mod list;
mod resolve;
mod session;
mod static_data;
#[cfg(test)]
mod test_fixtures;
mod types;
mod validation;
mod value;

pub use category::{CategoryClass, CategoryFamily};
pub use config::Config;
pub use crypto::{FieldCipher, PlainCipher};
pub use dataset::{CommitSummary, DataSet};
pub use entity::{AssetType, Entity, ExternalId, ItemState};
pub use error::{CoreError, CoreResult};
pub use history::HistoryTracker;
pub use info::{requirement, AttributeSet, InfoClass, InfoView, Requirement};
pub use list::{EntityList, ListMap};
pub use resolve::Resolver;
pub use session::{EditSet, SessionState};
pub use static_data::{CategoryTypeRow, StaticData};
pub use types::{Currency, ItemId, ItemType, ListStyle, Money};
pub use validation::{validate_item, ValidationErrors, ValidationFailure};
pub use value::{
    EncryptedValue, FieldId, FieldKind, FieldSpec, FieldValue, Link, RawValue, TextLimit,
    ValueBag, ValuesIn,
};
