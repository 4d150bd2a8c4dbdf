//! Error types produced by the store crate.

use thiserror::Error;

/// Errors surfaced by [`ItemStore`](crate::ItemStore) and its backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend failed (I/O, transaction, poisoned lock...).
    #[error("backend error: {0}")]
    Backend(String),
    /// A stored record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The referenced record does not exist (or is not visible).
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },
    /// Caller-supplied input is missing required fields.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The requested transition is not allowed from the record's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into())
    }

    pub(crate) fn item_not_found(id: u64) -> Self {
        StoreError::NotFound { kind: "item", id }
    }

    pub(crate) fn claim_not_found(id: u64) -> Self {
        StoreError::NotFound { kind: "claim", id }
    }
}
