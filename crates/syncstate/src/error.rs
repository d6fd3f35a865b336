//! Error types for the classifier facade.

use syncstate_core::StateError;
use thiserror::Error;

/// Errors that can occur when using a [`crate::Classifier`].
#[derive(Debug, Error)]
pub enum SyncStateError {
    /// The checkpoint batch is internally inconsistent.
    #[error("invalid checkpoint: {0}")]
    Classification(#[from] StateError),

    /// A checkpoint in a sequence is internally inconsistent.
    #[error("invalid checkpoint at position {position}: {source}")]
    Batch {
        position: usize,
        #[source]
        source: StateError,
    },

    /// The classifier configuration could not be read.
    #[error("invalid classifier config: {0}")]
    Config(#[from] serde_json::Error),
}

impl SyncStateError {
    /// The underlying classification error, if any.
    pub fn state_error(&self) -> Option<&StateError> {
        match self {
            SyncStateError::Classification(e) | SyncStateError::Batch { source: e, .. } => Some(e),
            SyncStateError::Config(_) => None,
        }
    }
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, SyncStateError>;
