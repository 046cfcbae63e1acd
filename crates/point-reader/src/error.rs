//! Error types for point reading.

use storage::StorageError;
use thiserror::Error;
use weather_common::{CommonError, SiUnit};

use crate::catalog::CdsDomain;

/// Errors that can occur while reading or deriving a point series.
#[derive(Error, Debug, Clone)]
pub enum ReaderError {
    /// No data for the variable at this point and time range.
    #[error("{variable} not found: {reason}")]
    NotFound { variable: String, reason: String },

    /// A derived variable could not be computed because an input is missing.
    #[error("{variable} unavailable in {domain}: dependency {dependency} not found")]
    DependencyUnavailable {
        variable: String,
        dependency: String,
        domain: CdsDomain,
        #[source]
        source: Box<ReaderError>,
    },

    /// A precondition of a formula or the configuration does not hold.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Two series with incompatible units were combined.
    #[error("unit mismatch: expected {expected}, got {actual}")]
    UnitMismatch { expected: SiUnit, actual: SiUnit },

    /// Variable name not in the catalog.
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// Domain name not in the catalog.
    #[error("unknown domain: {0}")]
    UnknownDomain(String),

    /// Storage failure other than missing data.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("time range error: {0}")]
    TimeRange(#[from] CommonError),
}

impl ReaderError {
    /// Create a NotFound error.
    pub fn not_found(variable: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        Self::NotFound {
            variable: variable.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Whether a mixer may fall through to the next domain.
    ///
    /// Only missing data is recoverable. Configuration, unit and storage
    /// errors abort the request.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::DependencyUnavailable { .. }
        )
    }
}

/// Result type for point reading operations.
pub type Result<T> = std::result::Result<T, ReaderError>;
