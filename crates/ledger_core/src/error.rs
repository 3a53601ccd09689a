//! Structural error types for the ledger core.
//!
//! These errors abort the current operation (loading a row, committing an
//! edit session). Domain rule violations are never reported here; they are
//! accumulated per item in [`ValidationErrors`](crate::ValidationErrors).

use crate::types::{ItemId, ItemType};
use crate::value::FieldId;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that indicate a broken framework invariant or corrupt input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An item with the same id is already present in the list.
    #[error("duplicate id {id} in {item_type} list")]
    DuplicateId {
        /// The list that rejected the item.
        item_type: ItemType,
        /// The clashing id.
        id: ItemId,
    },

    /// An external id carried an asset tag with no matching asset type.
    #[error("unknown asset type tag {tag}")]
    UnknownAssetType {
        /// The raw 4-bit tag.
        tag: u64,
    },

    /// A numeric enumeration id matched no variant.
    #[error("unknown {kind} id {id}")]
    UnknownClass {
        /// Name of the enumeration.
        kind: &'static str,
        /// The offending id.
        id: u32,
    },

    /// An id component does not fit in its bit range.
    #[error("{component} {value} exceeds limit {limit}")]
    IdOutOfRange {
        /// Which component overflowed.
        component: &'static str,
        /// The supplied value.
        value: u64,
        /// Exclusive upper bound.
        limit: u64,
    },

    /// Values supplied to a values constructor were malformed.
    #[error("malformed values for {item_type}: {message}")]
    MalformedValues {
        /// The item type being constructed.
        item_type: ItemType,
        /// Description of the problem.
        message: String,
    },

    /// A field was addressed that the item type does not declare.
    #[error("{item_type} has no field {field}")]
    UnknownField {
        /// The item type.
        item_type: ItemType,
        /// The undeclared field.
        field: FieldId,
    },

    /// A list for the item type is not registered in the container.
    #[error("no {item_type} list registered")]
    MissingList {
        /// The missing item type.
        item_type: ItemType,
    },

    /// A reference could not be resolved to a live item.
    #[error("{item_type} {id} field {field} references missing {target_type} {target_id}")]
    UnresolvedLink {
        /// Type of the referencing item.
        item_type: ItemType,
        /// Id of the referencing item.
        id: ItemId,
        /// The link field.
        field: FieldId,
        /// Type of the target.
        target_type: ItemType,
        /// Id of the target.
        target_id: ItemId,
    },

    /// An edited item has no committed counterpart.
    #[error("no committed counterpart for edited {item_type} {id}")]
    MissingCounterpart {
        /// Type of the edited item.
        item_type: ItemType,
        /// Id of the edited item.
        id: ItemId,
    },

    /// An item was not found.
    #[error("{item_type} {id} not found")]
    ItemNotFound {
        /// Type searched.
        item_type: ItemType,
        /// Id searched.
        id: ItemId,
    },

    /// Operation not permitted in the current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },

    /// A commit was blocked because edited items carry validation errors.
    #[error("commit blocked: {count} edited items have validation errors")]
    ValidationFailed {
        /// Number of items with errors.
        count: usize,
    },

    /// Encoding or decoding an encrypted payload failed.
    #[error("codec error: {message}")]
    Codec {
        /// Description of the failure.
        message: String,
    },

    /// Encryption is not enabled.
    #[error("encryption feature not enabled")]
    EncryptionNotEnabled,

    /// Encryption failed.
    #[error("encryption failed: {message}")]
    EncryptionFailed {
        /// Description of the failure.
        message: String,
    },

    /// Decryption failed.
    #[error("decryption failed: {message}")]
    DecryptionFailed {
        /// Description of the failure.
        message: String,
    },

    /// Invalid key size.
    #[error("invalid key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize {
        /// Expected size in bytes.
        expected: usize,
        /// Actual size in bytes.
        actual: usize,
    },
}

impl CoreError {
    /// Creates a duplicate id error.
    pub fn duplicate_id(item_type: ItemType, id: ItemId) -> Self {
        Self::DuplicateId { item_type, id }
    }

    /// Creates an unknown enumeration id error.
    pub fn unknown_class(kind: &'static str, id: u32) -> Self {
        Self::UnknownClass { kind, id }
    }

    /// Creates an id-out-of-range error.
    pub fn id_out_of_range(component: &'static str, value: u64, limit: u64) -> Self {
        Self::IdOutOfRange {
            component,
            value,
            limit,
        }
    }

    /// Creates a malformed values error.
    pub fn malformed_values(item_type: ItemType, message: impl Into<String>) -> Self {
        Self::MalformedValues {
            item_type,
            message: message.into(),
        }
    }

    /// Creates an unknown field error.
    pub fn unknown_field(item_type: ItemType, field: FieldId) -> Self {
        Self::UnknownField { item_type, field }
    }

    /// Creates a missing list error.
    pub fn missing_list(item_type: ItemType) -> Self {
        Self::MissingList { item_type }
    }

    /// Creates a missing counterpart error.
    pub fn missing_counterpart(item_type: ItemType, id: ItemId) -> Self {
        Self::MissingCounterpart { item_type, id }
    }

    /// Creates an item not found error.
    pub fn item_not_found(item_type: ItemType, id: ItemId) -> Self {
        Self::ItemNotFound { item_type, id }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Creates a codec error.
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /// Creates an encryption not enabled error.
    pub fn encryption_not_enabled() -> Self {
        Self::EncryptionNotEnabled
    }

    /// Creates an encryption failed error.
    pub fn encryption_failed(message: impl Into<String>) -> Self {
        Self::EncryptionFailed {
            message: message.into(),
        }
    }

    /// Creates a decryption failed error.
    pub fn decryption_failed(message: impl Into<String>) -> Self {
        Self::DecryptionFailed {
            message: message.into(),
        }
    }

    /// Creates an invalid key size error.
    pub fn invalid_key_size(actual: usize, expected: usize) -> Self {
        Self::InvalidKeySize { expected, actual }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_id_message_names_list() {
        let err = CoreError::duplicate_id(ItemType::Payee, ItemId::new(7));
        assert_eq!(err.to_string(), "duplicate id #7 in Payee list");
    }

    #[test]
    fn unresolved_link_message() {
        let err = CoreError::UnresolvedLink {
            item_type: ItemType::Cash,
            id: ItemId::new(3),
            field: FieldId::Category,
            target_type: ItemType::CashCategory,
            target_id: ItemId::new(9),
        };
        assert_eq!(
            err.to_string(),
            "Cash #3 field Category references missing CashCategory #9"
        );
    }
}
