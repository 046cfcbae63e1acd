//! Test data generators for creating synthetic weather-like series.
//!
//! These generators create predictable, verifiable series that can be
//! used across the test suite.

use std::f32::consts::PI;

/// Creates a series with the same value at every step.
pub fn constant_series(len: usize, value: f32) -> Vec<f32> {
    vec![value; len]
}

/// Creates a series `start, start + step, start + 2·step, ...`.
///
/// # Example
///
/// ```
/// use test_utils::linear_series;
///
/// assert_eq!(linear_series(3, 1.0, 0.5), vec![1.0, 1.5, 2.0]);
/// ```
pub fn linear_series(len: usize, start: f32, step: f32) -> Vec<f32> {
    (0..len).map(|i| start + step * i as f32).collect()
}

/// Creates an hourly series with a daily sine cycle.
///
/// The maximum `mean + amplitude` falls on `peak_hour` (0-23) of every day,
/// with step 0 at midnight.
pub fn diurnal_series(len: usize, mean: f32, amplitude: f32, peak_hour: f32) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let hour = (i % 24) as f32;
            mean + amplitude * (2.0 * PI * (hour - peak_hour) / 24.0).cos()
        })
        .collect()
}

/// Creates an hourly shortwave radiation series in W/m².
///
/// Zero at night, a half-sine between 06:00 and 18:00 peaking at `peak`.
pub fn radiation_series(len: usize, peak: f32) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let hour = (i % 24) as f32;
            if (6.0..=18.0).contains(&hour) {
                peak * (PI * (hour - 6.0) / 12.0).sin().max(0.0)
            } else {
                0.0
            }
        })
        .collect()
}

/// Replaces the values at `indices` with NaN.
pub fn with_gaps(mut values: Vec<f32>, indices: &[usize]) -> Vec<f32> {
    for &i in indices {
        if let Some(v) = values.get_mut(i) {
            *v = f32::NAN;
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diurnal_series_peak() {
        let series = diurnal_series(48, 10.0, 5.0, 14.0);
        assert_eq!(series.len(), 48);
        assert!((series[14] - 15.0).abs() < 1e-4);
        assert!((series[38] - 15.0).abs() < 1e-4);
        assert!((series[2] - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_radiation_series_is_dark_at_night() {
        let series = radiation_series(24, 800.0);
        assert_eq!(series[0], 0.0);
        assert_eq!(series[23], 0.0);
        assert!((series[12] - 800.0).abs() < 1e-3);
        assert!(series.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_with_gaps() {
        let series = with_gaps(constant_series(4, 1.0), &[1, 3, 10]);
        assert_eq!(series[0], 1.0);
        assert!(series[1].is_nan());
        assert!(series[3].is_nan());
    }
}
