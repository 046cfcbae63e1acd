//! Error types for storage access.

use thiserror::Error;

use crate::key::StorageKey;

/// Result type alias using StorageError.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors surfaced by storage backends and the decode cache.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// No stored data for the domain, variable, point and range.
    #[error("no data stored for {0}")]
    NotFound(StorageKey),

    /// The requested time axis cannot be served by the stored series.
    #[error("invalid time range for {key}: {message}")]
    InvalidRange { key: StorageKey, message: String },

    /// A decode returned a different number of values than requested.
    #[error("decoded {actual} values for {key}, expected {expected}")]
    LengthMismatch {
        key: StorageKey,
        expected: usize,
        actual: usize,
    },

    /// Backend specific failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Create a Backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
