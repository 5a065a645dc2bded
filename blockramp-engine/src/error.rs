//! Error types for the decision engine.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while reconciling the load decision.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Criteria store failure.
    #[error("store error: {0}")]
    Store(#[from] blockramp_criteria::StoreError),

    /// The configured editor bundle path failed the traversal check; the
    /// decision flag is left unset.
    #[error("editor bundle path fails validation: {}", .path.display())]
    InvalidBundlePath { path: PathBuf },

    /// The configured editor bundle does not exist; the decision flag is
    /// left unset.
    #[error("editor bundle not found: {}", .path.display())]
    BundleMissing { path: PathBuf },
}
