//! Error types for the criteria store.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in criteria store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Structural validation failure; the offending `set` is rejected
    /// entirely.
    #[error("criteria validation: {0}")]
    Criteria(#[from] blockramp_types::CriteriaError),

    /// Semantic validation failure at save time: the post type is not in
    /// the live supported set. The pending value is dropped, the persisted
    /// record untouched.
    #[error("post type \"{0}\" cannot support the block editor")]
    UnsupportedPostType(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file-backed stores).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure.
    #[error("backend error: {0}")]
    Backend(String),
}
