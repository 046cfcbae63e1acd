//! Addressing of stored series.

use serde::{Deserialize, Serialize};
use weather_common::TimeRange;

/// Identifies one decodable series: domain, variable, grid point and time axis.
///
/// Domain and variable are the storage names (directory and file name), so
/// the storage layer stays independent of the variable catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageKey {
    pub domain: String,
    pub variable: String,
    pub point: usize,
    pub time: TimeRange,
}

impl StorageKey {
    pub fn new(
        domain: impl Into<String>,
        variable: impl Into<String>,
        point: usize,
        time: TimeRange,
    ) -> Self {
        Self {
            domain: domain.into(),
            variable: variable.into(),
            point,
            time,
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}@{} [{}]",
            self.domain, self.variable, self.point, self.time
        )
    }
}
