//! Solar geometry for backward-averaged radiation.
//!
//! Radiation at timestamp `t` is the mean over `[t - dt, t]`. Zenith angles
//! are therefore integrated analytically over the same interval instead of
//! being sampled at an instant, which keeps sunrise and sunset hours stable.

use std::f64::consts::TAU;

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use weather_common::TimeRange;

/// Solar constant in W/m².
pub const SOLAR_CONSTANT: f32 = 1361.0;

/// Declination, equation of time and earth-sun distance for one instant.
#[derive(Debug, Clone, Copy)]
struct SolarPosition {
    /// radians
    declination: f64,
    /// minutes
    equation_of_time: f64,
    /// (r0/r)², dimensionless
    eccentricity: f64,
}

impl SolarPosition {
    /// NOAA series approximation from the fractional year.
    fn at(time: DateTime<Utc>) -> Self {
        let day_seconds = time.num_seconds_from_midnight() as f64;
        let day_fraction = (day_seconds / 3600.0 - 12.0) / 24.0;
        let gamma = TAU / 365.0 * (time.ordinal0() as f64 + day_fraction);

        let declination = 0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
            - 0.006758 * (2.0 * gamma).cos()
            + 0.000907 * (2.0 * gamma).sin()
            - 0.002697 * (3.0 * gamma).cos()
            + 0.00148 * (3.0 * gamma).sin();

        let equation_of_time = 229.18
            * (0.000075 + 0.001868 * gamma.cos()
                - 0.032077 * gamma.sin()
                - 0.014615 * (2.0 * gamma).cos()
                - 0.040849 * (2.0 * gamma).sin());

        let eccentricity = 1.000110
            + 0.034221 * gamma.cos()
            + 0.001280 * gamma.sin()
            + 0.000719 * (2.0 * gamma).cos()
            + 0.000077 * (2.0 * gamma).sin();

        Self {
            declination,
            equation_of_time,
            eccentricity,
        }
    }

    /// Solar hour angle in radians at `time` for `longitude` degrees east.
    fn hour_angle(&self, time: DateTime<Utc>, longitude: f64) -> f64 {
        let minutes = time.num_seconds_from_midnight() as f64 / 60.0;
        let true_solar_minutes = minutes + 4.0 * longitude + self.equation_of_time;
        (true_solar_minutes / 4.0 - 180.0).to_radians()
    }
}

/// Integral of `max(0, a + b·cos h)` over `[h0, h1]`, with `b >= 0`.
fn integrate_positive_cosine(a: f64, b: f64, h0: f64, h1: f64) -> f64 {
    if b <= 1e-12 {
        return a.max(0.0) * (h1 - h0);
    }
    let ratio = -a / b;
    if ratio <= -1.0 {
        // Polar day
        return a * (h1 - h0) + b * (h1.sin() - h0.sin());
    }
    if ratio >= 1.0 {
        return 0.0;
    }

    // Daylight windows are [2πk - ws, 2πk + ws]
    let sunset = ratio.acos();
    let first = ((h0 - sunset) / TAU).floor() as i64;
    let last = ((h1 + sunset) / TAU).ceil() as i64;

    (first..=last)
        .map(|k| {
            let center = k as f64 * TAU;
            let lo = h0.max(center - sunset);
            let hi = h1.min(center + sunset);
            if hi > lo {
                a * (hi - lo) + b * (hi.sin() - lo.sin())
            } else {
                0.0
            }
        })
        .sum()
}

/// Mean of `max(0, cos zenith)` over the `dt_seconds` ending at `end`,
/// plus the earth-sun distance correction at the interval midpoint.
fn mean_cos_zenith_backwards(
    latitude: f32,
    longitude: f32,
    end: DateTime<Utc>,
    dt_seconds: i64,
) -> (f64, f64) {
    let middle = end - Duration::seconds(dt_seconds / 2);
    let position = SolarPosition::at(middle);

    let lat = (latitude as f64).to_radians();
    let a = lat.sin() * position.declination.sin();
    let b = lat.cos() * position.declination.cos();

    let h1 = position.hour_angle(end, longitude as f64);
    // Hour angle advances 2π per day, ignoring the drift of the equation of time
    let h0 = h1 - dt_seconds as f64 / 86_400.0 * TAU;

    let mean = integrate_positive_cosine(a, b.max(0.0), h0, h1) / (h1 - h0);
    (mean, position.eccentricity)
}

/// Extraterrestrial horizontal irradiance in W/m², averaged backwards over
/// each timestep of `time`.
pub fn extraterrestrial_radiation_backwards(
    latitude: f32,
    longitude: f32,
    time: &TimeRange,
) -> Vec<f32> {
    time.iter()
        .map(|t| {
            let (cos_zenith, eccentricity) =
                mean_cos_zenith_backwards(latitude, longitude, t, time.dt_seconds);
            (SOLAR_CONSTANT as f64 * eccentricity * cos_zenith) as f32
        })
        .collect()
}

/// Direct normal irradiance from backward-averaged direct horizontal radiation.
///
/// Zero when the sun stays below the horizon for the whole interval, and
/// never above the extraterrestrial normal irradiance.
pub fn calculate_backwards_dni(
    direct_radiation: &[f32],
    latitude: f32,
    longitude: f32,
    time: &TimeRange,
) -> Vec<f32> {
    direct_radiation
        .iter()
        .zip(time.iter())
        .map(|(&direct, t)| {
            if direct.is_nan() {
                return f32::NAN;
            }
            let (cos_zenith, eccentricity) =
                mean_cos_zenith_backwards(latitude, longitude, t, time.dt_seconds);
            if cos_zenith <= 0.0 {
                return 0.0;
            }
            let ceiling = SOLAR_CONSTANT as f64 * eccentricity;
            (direct as f64 / cos_zenith).min(ceiling) as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::f64::consts::PI;
    use test_utils::assert_approx_eq;

    fn equinox_day() -> TimeRange {
        // Values are backward means, so the first step covers 00:00-01:00
        let start = Utc.with_ymd_and_hms(2024, 3, 20, 1, 0, 0).unwrap();
        TimeRange::hourly(start, 24).unwrap()
    }

    #[test]
    fn test_daily_mean_at_equator_equinox() {
        let radiation = extraterrestrial_radiation_backwards(0.0, 0.0, &equinox_day());
        let mean = radiation.iter().sum::<f32>() / 24.0;
        // S0 / π for a full day with the sun in the equatorial plane
        assert_approx_eq!(mean, SOLAR_CONSTANT / std::f32::consts::PI, 15.0);
    }

    #[test]
    fn test_night_is_zero_and_noon_is_peak() {
        let radiation = extraterrestrial_radiation_backwards(0.0, 0.0, &equinox_day());
        // Interval ending 03:00 UTC is deep night at longitude 0
        assert_eq!(radiation[2], 0.0);
        let peak = radiation.iter().cloned().fold(0.0, f32::max);
        assert!(peak > 1250.0 && peak < SOLAR_CONSTANT * 1.01, "peak {}", peak);
        // Intervals ending 12:00 and 13:00 straddle solar noon
        assert!(radiation[11] > 1250.0 && radiation[12] > 1250.0);
    }

    #[test]
    fn test_polar_night_and_day() {
        let start = Utc.with_ymd_and_hms(2024, 12, 21, 1, 0, 0).unwrap();
        let time = TimeRange::hourly(start, 24).unwrap();

        let arctic = extraterrestrial_radiation_backwards(80.0, 0.0, &time);
        assert!(arctic.iter().all(|&v| v == 0.0));

        let antarctic = extraterrestrial_radiation_backwards(-80.0, 0.0, &time);
        assert!(antarctic.iter().all(|&v| v > 0.0));
    }

    #[test]
    fn test_dni() {
        let time = equinox_day();
        let direct = vec![300.0; 24];
        let dni = calculate_backwards_dni(&direct, 45.0, 0.0, &time);

        assert_eq!(dni[2], 0.0);
        for (i, (&n, &d)) in dni.iter().zip(&direct).enumerate() {
            assert!(n <= SOLAR_CONSTANT * 1.04, "step {} exceeds ceiling", i);
            if n > 0.0 {
                assert!(n >= d, "dni {} below direct {} at {}", n, d, i);
            }
        }
        assert!(calculate_backwards_dni(&[f32::NAN], 45.0, 0.0, &time)[0].is_nan());
    }

    #[test]
    fn test_integrate_positive_cosine() {
        // Full period of cos h clipped at zero: 2
        assert_approx_eq!(integrate_positive_cosine(0.0, 1.0, -PI, PI), 2.0, 1e-9);
        // Never positive
        assert_eq!(integrate_positive_cosine(-2.0, 1.0, -PI, PI), 0.0);
        // Always positive: 2π·a
        assert_approx_eq!(integrate_positive_cosine(2.0, 1.0, -PI, PI), 2.0 * TAU, 1e-9);
    }
}
