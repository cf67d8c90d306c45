//! Card store error module.
//!
//! The store has exactly two recoverable domain errors, duplicate key and not
//! found. `InvariantViolation` only ever signals a bug in the indexes.

use thiserror::Error;

/// Errors returned by the card store and its indexes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A card with this id is already present; the operation was skipped.
    #[error("Card with id '{id}' already exists")]
    DuplicateKey {
        /// The rejected id
        id: String,
    },

    /// No card with this id is present.
    #[error("Card with id '{id}' not found")]
    NotFound {
        /// The missing id
        id: String,
    },

    /// The hash index and the ordered index disagree, or the tree is unbalanced.
    #[error("Structural invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type for card store operations.
pub type StoreResult<T> = Result<T, StoreError>;
