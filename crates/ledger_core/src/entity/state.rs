//! Item lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Persistence state of an item, derived from its flags and history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    /// Unchanged since it was loaded or last saved.
    Clean,
    /// Added since the last save.
    New,
    /// Values differ from the last saved values.
    Changed,
    /// Deleted since the last save.
    Deleted,
    /// Added and deleted again before being saved.
    DeletedNew,
}

impl ItemState {
    /// Returns true if the item needs to be written by the next save.
    #[must_use]
    pub const fn needs_save(self) -> bool {
        !matches!(self, Self::Clean | Self::DeletedNew)
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Clean => "clean",
            Self::New => "new",
            Self::Changed => "changed",
            Self::Deleted => "deleted",
            Self::DeletedNew => "deleted-new",
        };
        f.write_str(name)
    }
}
