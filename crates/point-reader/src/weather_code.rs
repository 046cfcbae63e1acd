//! WMO weather interpretation codes.

use serde::{Deserialize, Serialize};

use crate::meteorology::SNOW_DEPTH_PER_WATER_EQUIVALENT;
use crate::types::zip_n;

/// WMO code table 4677 subset reachable from ERA5 inputs.
///
/// Thunderstorms, showers, fog and freezing rain need gusts, CAPE,
/// convective precipitation or visibility, which ERA5 does not provide here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum WeatherCode {
    ClearSky = 0,
    MainlyClear = 1,
    PartlyCloudy = 2,
    Overcast = 3,
    SlightRain = 61,
    ModerateRain = 63,
    HeavyRain = 65,
    SlightSnowfall = 71,
    ModerateSnowfall = 73,
    HeavySnowfall = 75,
}

impl WeatherCode {
    /// Minimum precipitation rate in mm/h reported as precipitation.
    pub const PRECIPITATION_THRESHOLD: f32 = 0.1;

    /// Classify one timestep.
    ///
    /// `precipitation` in mm and `snowfall` in cm, both accumulated over
    /// `dt_hours`; `cloudcover` in %. Returns `None` when an input is missing.
    pub fn calculate(
        cloudcover: f32,
        precipitation: f32,
        snowfall: f32,
        dt_hours: f32,
    ) -> Option<Self> {
        let missing = cloudcover.is_nan() || precipitation.is_nan() || snowfall.is_nan();
        if missing || dt_hours <= 0.0 {
            return None;
        }

        let precipitation_rate = precipitation / dt_hours;
        let snowfall_rate = snowfall / dt_hours;

        if precipitation_rate >= Self::PRECIPITATION_THRESHOLD {
            // Snow dominates when at least half the water falls as snow
            let snow_water_rate = snowfall_rate / SNOW_DEPTH_PER_WATER_EQUIVALENT;
            if snow_water_rate >= 0.5 * precipitation_rate {
                return Some(match snowfall_rate {
                    r if r >= 0.8 => Self::HeavySnowfall,
                    r if r >= 0.2 => Self::ModerateSnowfall,
                    _ => Self::SlightSnowfall,
                });
            }
            return Some(match precipitation_rate {
                r if r >= 7.6 => Self::HeavyRain,
                r if r >= 2.5 => Self::ModerateRain,
                _ => Self::SlightRain,
            });
        }

        Some(match cloudcover {
            c if c >= 80.0 => Self::Overcast,
            c if c >= 50.0 => Self::PartlyCloudy,
            c if c >= 20.0 => Self::MainlyClear,
            _ => Self::ClearSky,
        })
    }

    /// Numeric code.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Weather codes for whole series, NaN where an input is missing.
pub fn calculate_series(
    cloudcover: &[f32],
    precipitation: &[f32],
    snowfall: &[f32],
    dt_hours: f32,
) -> Vec<f32> {
    zip_n([cloudcover, precipitation, snowfall], |[c, p, s]| {
        WeatherCode::calculate(c, p, s, dt_hours).map_or(f32::NAN, |code| code.code() as f32)
    })
}
