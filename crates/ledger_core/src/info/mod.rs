//! Optional typed attributes of accounts.
//!
//! Attribute values are stored as records in the owner's info list
//! (`CashInfo` for `Cash`, and so on), one record per [`InfoClass`]. Each
//! owner carries an [`AttributeSet`] indexing its records, and an
//! [`InfoView`] reads, validates and defaults them.

mod class;
mod policy;
mod set;
mod view;

pub use class::InfoClass;
pub use policy::{requirement, Requirement};
pub use set::AttributeSet;
pub use view::InfoView;
