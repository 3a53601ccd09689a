//! Edit session state.

use crate::error::{CoreError, CoreResult};
use std::fmt;

/// State of an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The session accepts edits.
    Active,
    /// The session has been committed into its data set.
    Committed,
    /// The session has been abandoned.
    Abandoned,
}

impl SessionState {
    /// Fails unless the session is active.
    pub(crate) fn ensure_active(self) -> CoreResult<()> {
        match self {
            Self::Active => Ok(()),
            Self::Committed => Err(CoreError::invalid_operation(
                "edit session has already been committed",
            )),
            Self::Abandoned => Err(CoreError::invalid_operation(
                "edit session has been abandoned",
            )),
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Active => "active",
            Self::Committed => "committed",
            Self::Abandoned => "abandoned",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_sessions_accept_edits() {
        assert!(SessionState::Active.ensure_active().is_ok());
        assert!(matches!(
            SessionState::Committed.ensure_active(),
            Err(CoreError::InvalidOperation { .. })
        ));
        assert!(matches!(
            SessionState::Abandoned.ensure_active(),
            Err(CoreError::InvalidOperation { .. })
        ));
    }
}
