//! Core type definitions for Blockramp.
//!
//! This crate defines the validated criteria record that governs
//! editor-load decisions, and nothing else:
//! - `PostId` and `PostTypeSlug` newtypes with their invariants
//! - `LoadOverride`, the global always/never switch
//! - `Criteria`, the record itself, with structural validation and the
//!   merge rule used when a theme supplies criteria more than once
//!
//! Storage, request handling and the decision algorithm live in their own
//! crates; they consume these types but add no fields to them.

mod criteria;
mod ids;

pub use criteria::{Criteria, LoadOverride};
pub use ids::{PostId, PostTypeSlug};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, CriteriaError>;

/// Structural validation errors for criteria input.
///
/// Any of these rejects the whole record; a criteria update is never
/// partially applied.
#[derive(Debug, thiserror::Error)]
pub enum CriteriaError {
    #[error("criteria must be a mapping, got: {0}")]
    NotAnObject(String),

    #[error("criteria mapping is empty")]
    Empty,

    #[error("unknown criteria field: {0}")]
    UnknownField(String),

    #[error("post id must be a positive integer, got: {0}")]
    InvalidPostId(String),

    #[error("post type is not a sanitized slug: {0}")]
    InvalidPostType(String),

    #[error("load flag must be 0, 1 or a bool, got: {0}")]
    InvalidLoadFlag(String),
}
