//! Point query types.
//!
//! # Examples
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use point_reader::{CdsDomain, DomainPoint, PointQuery};
//! use weather_common::TimeRange;
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let time = TimeRange::hourly(start, 24).unwrap();
//!
//! let query = PointQuery::new(time)
//!     .variable("temperature_2m".parse().unwrap())
//!     .variable("rain".parse().unwrap())
//!     .domain(DomainPoint::from_grid(CdsDomain::Era5Land, 1_000_000, 412.0).unwrap())
//!     .domain(DomainPoint::from_grid(CdsDomain::Era5, 250_000, 398.0).unwrap())
//!     .at_elevation(405.0);
//! assert_eq!(query.variables.len(), 2);
//! ```

use serde::{Deserialize, Serialize, Serializer};
use weather_common::{GridPoint, TimeRange};

use crate::catalog::{CdsDomain, Era5HourlyVariable};
use crate::error::{ReaderError, Result};
use crate::types::ValueSeries;

/// A grid cell of one domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainPoint {
    pub domain: CdsDomain,
    pub point: GridPoint,
}

impl DomainPoint {
    pub fn new(domain: CdsDomain, point: GridPoint) -> Self {
        Self { domain, point }
    }

    /// Resolve a flat grid index of `domain` to its coordinates.
    pub fn from_grid(domain: CdsDomain, index: usize, elevation: f32) -> Result<Self> {
        let point = domain.grid().point(index, elevation).ok_or_else(|| {
            ReaderError::invalid_configuration(format!(
                "grid index {} outside {} grid",
                index, domain
            ))
        })?;
        Ok(Self { domain, point })
    }
}

/// A request for several variables at one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointQuery {
    pub variables: Vec<Era5HourlyVariable>,
    pub time: TimeRange,
    /// Domains in preference order
    pub domains: Vec<DomainPoint>,
    /// Elevation to correct temperatures to, defaults to the cell elevation
    #[serde(default)]
    pub target_elevation: Option<f32>,
}

impl PointQuery {
    pub fn new(time: TimeRange) -> Self {
        Self {
            variables: Vec::new(),
            time,
            domains: Vec::new(),
            target_elevation: None,
        }
    }

    pub fn variable(mut self, variable: Era5HourlyVariable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn variables(mut self, variables: impl IntoIterator<Item = Era5HourlyVariable>) -> Self {
        self.variables.extend(variables);
        self
    }

    /// Append a domain with lower preference than those already added.
    pub fn domain(mut self, domain: DomainPoint) -> Self {
        self.domains.push(domain);
        self
    }

    pub fn at_elevation(mut self, elevation: f32) -> Self {
        self.target_elevation = Some(elevation);
        self
    }
}

/// Outcome for one requested variable.
#[derive(Debug, Clone)]
pub struct VariableResult {
    pub variable: Era5HourlyVariable,
    pub result: Result<ValueSeries>,
}

impl VariableResult {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn series(&self) -> Option<&ValueSeries> {
        self.result.as_ref().ok()
    }
}

#[derive(Serialize)]
struct VariableResultJson<'a> {
    variable: Era5HourlyVariable,
    #[serde(flatten)]
    series: Option<&'a ValueSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Serialize for VariableResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        VariableResultJson {
            variable: self.variable,
            series: self.series(),
            error: self.result.as_ref().err().map(|e| e.to_string()),
        }
        .serialize(serializer)
    }
}

/// Results of a [`PointQuery`], in request order.
#[derive(Debug, Clone, Serialize)]
pub struct PointResponse {
    pub time: TimeRange,
    pub results: Vec<VariableResult>,
}

impl PointResponse {
    /// Result for `variable`, if it was requested.
    pub fn get(&self, variable: Era5HourlyVariable) -> Option<&Result<ValueSeries>> {
        self.results
            .iter()
            .find(|r| r.variable == variable)
            .map(|r| &r.result)
    }
}
