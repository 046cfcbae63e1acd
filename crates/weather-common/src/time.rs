//! Time handling for evenly spaced meteorological series.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CommonError, CommonResult};

/// Parse an ISO 8601 timestamp, assuming UTC when no offset is given.
///
/// Accepts `2024-01-15T12:00:00Z`, `2024-01-15T12:00:00`, `2024-01-15T12:00`
/// and plain dates (`2024-01-15`, interpreted as midnight).
pub fn parse_iso8601(s: &str) -> CommonResult<DateTime<Utc>> {
    // Try full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    // Try date only
    if let Ok(ndt) = NaiveDateTime::parse_from_str(&format!("{}T00:00:00", s), "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    Err(CommonError::InvalidFormat(s.to_string()))
}

/// A half-open, evenly spaced time axis `[start, end)` with step `dt_seconds`.
///
/// Construction guarantees `dt_seconds > 0`, `start <= end` and that the
/// span is a whole number of steps, so `count()` is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub dt_seconds: i64,
}

#[derive(Deserialize)]
struct RawTimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    dt_seconds: i64,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = CommonError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        TimeRange::new(raw.start, raw.end, raw.dt_seconds)
    }
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, dt_seconds: i64) -> CommonResult<Self> {
        if dt_seconds <= 0 {
            return Err(CommonError::InvalidTimeRange(format!(
                "dt_seconds must be > 0, got {}",
                dt_seconds
            )));
        }
        if start > end {
            return Err(CommonError::InvalidTimeRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        let span = (end - start).num_seconds();
        if span % dt_seconds != 0 {
            return Err(CommonError::InvalidTimeRange(format!(
                "span of {}s is not a multiple of dt {}s",
                span, dt_seconds
            )));
        }
        Ok(Self {
            start,
            end,
            dt_seconds,
        })
    }

    /// `count` steps of `dt_seconds` starting at `start`.
    pub fn with_count(start: DateTime<Utc>, count: usize, dt_seconds: i64) -> CommonResult<Self> {
        let end = start + Duration::seconds(dt_seconds.max(0) * count as i64);
        Self::new(start, end, dt_seconds)
    }

    /// Hourly range with `count` steps.
    pub fn hourly(start: DateTime<Utc>, count: usize) -> CommonResult<Self> {
        Self::with_count(start, count, 3600)
    }

    /// Parse start and end timestamps, see [`parse_iso8601`].
    pub fn from_iso8601(start: &str, end: &str, dt_seconds: i64) -> CommonResult<Self> {
        Self::new(parse_iso8601(start)?, parse_iso8601(end)?, dt_seconds)
    }

    /// Number of timesteps.
    pub fn count(&self) -> usize {
        ((self.end - self.start).num_seconds() / self.dt_seconds) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Step length in hours (fractional for sub-hourly steps).
    pub fn dt_hours(&self) -> f32 {
        self.dt_seconds as f32 / 3600.0
    }

    /// Timestamp of step `i`. Does not check bounds.
    pub fn time_at(&self, i: usize) -> DateTime<Utc> {
        self.start + Duration::seconds(self.dt_seconds * i as i64)
    }

    /// Iterate over all timestamps.
    pub fn iter(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        (0..self.count()).map(move |i| self.time_at(i))
    }

    /// Position of `time` on this axis, if it lies on a step inside the range.
    pub fn index_of(&self, time: DateTime<Utc>) -> Option<usize> {
        if time < self.start || time >= self.end {
            return None;
        }
        let offset = (time - self.start).num_seconds();
        if offset % self.dt_seconds != 0 {
            return None;
        }
        Some((offset / self.dt_seconds) as usize)
    }

    pub fn contains(&self, dt: &DateTime<Utc>) -> bool {
        dt >= &self.start && dt < &self.end
    }

    /// Whether two ranges share at least one instant.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} dt={}s",
            self.start.format("%Y-%m-%dT%H:%M"),
            self.end.format("%Y-%m-%dT%H:%M"),
            self.dt_seconds
        )
    }
}
