//! # Ledger Testkit
//!
//! Test utilities for the ledger core.
//!
//! This crate provides:
//! - Standard static tables and prebuilt, resolved data sets
//! - Row builders for every item type
//! - Property-based test generators using proptest
//! - JSON row documents written to temporary files
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_testkit::prelude::*;
//!
//! #[test]
//! fn rename_in_session() {
//!     let data = household();
//!     let mut edits = data.derive_edit_set().unwrap();
//!     // ... edit and commit
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
