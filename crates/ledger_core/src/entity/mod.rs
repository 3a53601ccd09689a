//! Versioned items and their external identifiers.

mod id;
mod item;
mod state;

pub use id::{AssetType, ExternalId};
pub use item::Entity;
pub use state::ItemState;
