//! Incrementally maintained list indexes.

mod data_map;
mod hash;
mod traits;

pub use data_map::{DataMap, MapKeys};
pub use hash::HashIndex;
pub use traits::{Index, IndexKey};
