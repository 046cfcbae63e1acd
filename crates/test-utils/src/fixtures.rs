//! Common test fixtures for point read-path tests.
//!
//! Time ranges and grid points used across the test suite, so storage
//! fixtures and readers agree on keys.

use chrono::{DateTime, TimeZone, Utc};
use weather_common::{GridPoint, TimeRange};

/// Grid index used for single-point fixtures.
pub const POINT_INDEX: usize = 1234;

/// Start of the fixture day (summer, so radiation is non-trivial).
pub fn day_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

/// 24 hourly steps starting at [`day_start`].
pub fn day_range() -> TimeRange {
    hourly_range(24)
}

/// `count` hourly steps starting at [`day_start`].
pub fn hourly_range(count: usize) -> TimeRange {
    TimeRange::hourly(day_start(), count).unwrap()
}

/// `count` three-hourly steps starting at [`day_start`].
pub fn three_hourly_range(count: usize) -> TimeRange {
    TimeRange::with_count(day_start(), count, 3 * 3600).unwrap()
}

/// Well-known locations as (latitude, longitude, elevation in metres).
pub mod locations {
    /// Zurich, Switzerland
    pub const ZURICH: (f32, f32, f32) = (47.37, 8.55, 408.0);

    /// Denver, Colorado (high elevation)
    pub const DENVER: (f32, f32, f32) = (39.74, -104.99, 1609.0);

    /// Equator at the prime meridian, sea level
    pub const NULL_ISLAND: (f32, f32, f32) = (0.0, 0.0, 0.0);
}

/// A grid point at `location` with the fixture index.
pub fn point_at(location: (f32, f32, f32)) -> GridPoint {
    let (latitude, longitude, elevation) = location;
    GridPoint::new(POINT_INDEX, latitude, longitude, elevation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        assert_eq!(day_range().count(), 24);
        assert_eq!(three_hourly_range(8).count(), 8);
        assert_eq!(three_hourly_range(8).dt_seconds, 10_800);
    }

    #[test]
    fn test_point_at() {
        let p = point_at(locations::DENVER);
        assert_eq!(p.index, POINT_INDEX);
        assert_eq!(p.elevation, 1609.0);
    }
}
