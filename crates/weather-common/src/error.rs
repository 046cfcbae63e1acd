//! Error types shared by the read-path crates.

use thiserror::Error;

/// Result type alias using CommonError.
pub type CommonResult<T> = Result<T, CommonError>;

/// Errors raised while validating shared value types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommonError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),
}
