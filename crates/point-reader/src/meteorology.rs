//! Scalar meteorological formulas.
//!
//! All functions work on single values so they can be mapped over series.
//! NaN inputs produce NaN outputs; clamping helpers keep that property.

use crate::config::CloudCoverLaw;

/// Standard atmosphere temperature lapse rate in K/m.
pub const TEMPERATURE_LAPSE_RATE: f32 = 0.0065;

/// Depth of fresh snow per unit depth of water equivalent.
pub const SNOW_TO_WATER_DEPTH_RATIO: f32 = 7.0;

/// Snow depth in cm per mm of snowfall water equivalent.
pub const SNOW_DEPTH_PER_WATER_EQUIVALENT: f32 = SNOW_TO_WATER_DEPTH_RATIO / 10.0;

const MAGNUS_BETA: f32 = 17.625;
const MAGNUS_LAMBDA: f32 = 243.04;

/// `max(value, min)` that keeps NaN.
pub fn clamp_min(value: f32, min: f32) -> f32 {
    if value.is_nan() {
        value
    } else {
        value.max(min)
    }
}

/// Wind speed from u/v components.
pub fn windspeed(u: f32, v: f32) -> f32 {
    (u * u + v * v).sqrt()
}

/// Meteorological wind direction (where the wind blows from) in [0, 360).
pub fn wind_direction(u: f32, v: f32) -> f32 {
    let direction = u.atan2(v).to_degrees() + 180.0;
    direction.rem_euclid(360.0) % 360.0
}

/// Relative humidity in % from temperature and dewpoint in °C (Magnus).
///
/// Not clamped; supersaturated inputs exceed 100.
pub fn relative_humidity(temperature: f32, dewpoint: f32) -> f32 {
    let magnus = |t: f32| (MAGNUS_BETA * t / (MAGNUS_LAMBDA + t)).exp();
    100.0 * magnus(dewpoint) / magnus(temperature)
}

/// Saturation vapour pressure over water in kPa (Tetens, FAO-56 eq. 11).
pub fn saturation_vapor_pressure(temperature: f32) -> f32 {
    0.6108 * (17.27 * temperature / (temperature + 237.3)).exp()
}

/// Vapour pressure deficit in kPa.
pub fn vapor_pressure_deficit(temperature: f32, dewpoint: f32) -> f32 {
    saturation_vapor_pressure(temperature) - saturation_vapor_pressure(dewpoint)
}

/// Steadman apparent temperature in °C, including the radiation term.
///
/// `shortwave` in W/m², `windspeed` in m/s at 10 m.
pub fn apparent_temperature(
    temperature: f32,
    relative_humidity: f32,
    windspeed: f32,
    shortwave: f32,
) -> f32 {
    let vapor_pressure =
        relative_humidity / 100.0 * 6.105 * (17.27 * temperature / (237.7 + temperature)).exp();
    temperature + 0.348 * vapor_pressure - 0.7 * windspeed + 0.7 * shortwave / (windspeed + 10.0)
        - 4.25
}

/// Reduce mean sea level pressure to `elevation` metres.
///
/// Output has the unit of `pressure`.
pub fn surface_pressure(temperature: f32, pressure: f32, elevation: f32) -> f32 {
    let dz = TEMPERATURE_LAPSE_RATE * elevation;
    pressure * (1.0 - dz / (temperature + dz + 273.15)).powf(5.257)
}

/// Total cloud cover in % from the three layers.
pub fn cloud_cover_total(low: f32, mid: f32, high: f32, law: CloudCoverLaw) -> f32 {
    match law {
        CloudCoverLaw::Additive => {
            let sum = low + mid + high;
            if sum.is_nan() {
                sum
            } else {
                sum.clamp(0.0, 100.0)
            }
        }
        CloudCoverLaw::RandomOverlap => {
            let clear = (1.0 - low / 100.0) * (1.0 - mid / 100.0) * (1.0 - high / 100.0);
            100.0 * (1.0 - clear)
        }
    }
}

/// Factor converting wind speed at `height` metres to 2 m (FAO-56 eq. 47).
pub fn wind_speed_2m_factor(height: f32) -> f32 {
    4.87 / (67.8 * height - 5.42).ln()
}

/// Inputs of the hourly reference evapotranspiration.
#[derive(Debug, Clone, Copy)]
pub struct Et0Input {
    /// °C
    pub temperature: f32,
    /// °C
    pub dewpoint: f32,
    /// m/s at 10 m
    pub windspeed_10m: f32,
    /// W/m², mean over the hour
    pub shortwave_radiation: f32,
    /// W/m², mean over the hour
    pub extraterrestrial_radiation: f32,
    /// metres
    pub elevation: f32,
}

/// FAO-56 Penman-Monteith reference evapotranspiration for one hour, in mm.
///
/// Uses the hourly form (eq. 53) with the day/night soil heat flux and
/// surface resistance terms. Negative results are clamped to 0.
pub fn et0_evapotranspiration_hourly(input: Et0Input) -> f32 {
    const ALBEDO: f32 = 0.23;
    const STEFAN_BOLTZMANN_HOURLY: f32 = 2.043e-10; // MJ K-4 m-2 h-1
    const WATTS_TO_MJ_PER_HOUR: f32 = 0.0036;

    let Et0Input {
        temperature,
        dewpoint,
        windspeed_10m,
        shortwave_radiation,
        extraterrestrial_radiation,
        elevation,
    } = input;

    let windspeed_2m = windspeed_10m * wind_speed_2m_factor(10.0);

    let saturation = saturation_vapor_pressure(temperature);
    let actual = saturation_vapor_pressure(dewpoint);
    let slope = 4098.0 * saturation / (temperature + 237.3).powi(2);

    let pressure = 101.3 * ((293.0 - 0.0065 * elevation) / 293.0).powf(5.26);
    let psychrometric = 0.000665 * pressure;

    let shortwave = shortwave_radiation * WATTS_TO_MJ_PER_HOUR;
    let extraterrestrial = extraterrestrial_radiation * WATTS_TO_MJ_PER_HOUR;
    let clear_sky = (0.75 + 2e-5 * elevation) * extraterrestrial;
    let is_day = extraterrestrial > 0.0;

    // Rs/Rso is undefined at night; FAO suggests a typical evening value
    let relative_shortwave = if clear_sky > 0.0 {
        (shortwave / clear_sky).clamp(0.3, 1.0)
    } else {
        0.5
    };

    let net_shortwave = (1.0 - ALBEDO) * shortwave;
    let temperature_kelvin = temperature + 273.16;
    let net_longwave = STEFAN_BOLTZMANN_HOURLY
        * temperature_kelvin.powi(4)
        * (0.34 - 0.14 * actual.max(0.0).sqrt())
        * (1.35 * relative_shortwave - 0.35);
    let net_radiation = net_shortwave - net_longwave;

    let (soil_heat_flux, surface_coefficient) = if is_day {
        (0.1 * net_radiation, 0.24)
    } else {
        (0.5 * net_radiation, 0.96)
    };

    let numerator = 0.408 * slope * (net_radiation - soil_heat_flux)
        + psychrometric * (37.0 / (temperature + 273.0)) * windspeed_2m * (saturation - actual);
    let denominator = slope + psychrometric * (1.0 + surface_coefficient * windspeed_2m);

    clamp_min(numerator / denominator, 0.0)
}
