//! Variable catalog for the ERA5 domains.
//!
//! Every lookup is a total `match` over a closed enum, so adding a variable
//! without its metadata fails to compile.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use weather_common::{grids, GridSpec, SiUnit};

use crate::error::ReaderError;

/// A gridded data source with its own resolution and variable coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CdsDomain {
    /// ERA5 reanalysis, 0.25°
    Era5,
    /// ERA5-Land, 0.1°, land surface variables only
    Era5Land,
}

impl CdsDomain {
    pub const ALL: [CdsDomain; 2] = [CdsDomain::Era5, CdsDomain::Era5Land];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Era5 => "era5",
            Self::Era5Land => "era5_land",
        }
    }

    /// Directory holding the domain's series in the store.
    pub fn om_file_directory(&self) -> &'static str {
        match self {
            Self::Era5 => "era5",
            Self::Era5Land => "era5-land",
        }
    }

    pub fn grid(&self) -> GridSpec {
        match self {
            Self::Era5 => grids::era5_0p25(),
            Self::Era5Land => grids::era5_land_0p1(),
        }
    }

    /// Native time step of the stored series.
    pub fn dt_seconds(&self) -> i64 {
        3600
    }
}

impl std::fmt::Display for CdsDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CdsDomain {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ReaderError::UnknownDomain(s.to_string()))
    }
}

/// Raw variables physically stored in the time-series store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Era5Variable {
    Temperature2m,
    WindUComponent100m,
    WindVComponent100m,
    WindUComponent10m,
    WindVComponent10m,
    Windgusts10m,
    Dewpoint2m,
    CloudcoverLow,
    CloudcoverMid,
    CloudcoverHigh,
    PressureMsl,
    SnowfallWaterEquivalent,
    SoilTemperature0To7cm,
    SoilTemperature7To28cm,
    SoilTemperature28To100cm,
    SoilTemperature100To255cm,
    SoilMoisture0To7cm,
    SoilMoisture7To28cm,
    SoilMoisture28To100cm,
    SoilMoisture100To255cm,
    ShortwaveRadiation,
    Precipitation,
    DirectRadiation,
}

impl Era5Variable {
    pub const ALL: [Era5Variable; 23] = [
        Self::Temperature2m,
        Self::WindUComponent100m,
        Self::WindVComponent100m,
        Self::WindUComponent10m,
        Self::WindVComponent10m,
        Self::Windgusts10m,
        Self::Dewpoint2m,
        Self::CloudcoverLow,
        Self::CloudcoverMid,
        Self::CloudcoverHigh,
        Self::PressureMsl,
        Self::SnowfallWaterEquivalent,
        Self::SoilTemperature0To7cm,
        Self::SoilTemperature7To28cm,
        Self::SoilTemperature28To100cm,
        Self::SoilTemperature100To255cm,
        Self::SoilMoisture0To7cm,
        Self::SoilMoisture7To28cm,
        Self::SoilMoisture28To100cm,
        Self::SoilMoisture100To255cm,
        Self::ShortwaveRadiation,
        Self::Precipitation,
        Self::DirectRadiation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature2m => "temperature_2m",
            Self::WindUComponent100m => "wind_u_component_100m",
            Self::WindVComponent100m => "wind_v_component_100m",
            Self::WindUComponent10m => "wind_u_component_10m",
            Self::WindVComponent10m => "wind_v_component_10m",
            Self::Windgusts10m => "windgusts_10m",
            Self::Dewpoint2m => "dewpoint_2m",
            Self::CloudcoverLow => "cloudcover_low",
            Self::CloudcoverMid => "cloudcover_mid",
            Self::CloudcoverHigh => "cloudcover_high",
            Self::PressureMsl => "pressure_msl",
            Self::SnowfallWaterEquivalent => "snowfall_water_equivalent",
            Self::SoilTemperature0To7cm => "soil_temperature_0_to_7cm",
            Self::SoilTemperature7To28cm => "soil_temperature_7_to_28cm",
            Self::SoilTemperature28To100cm => "soil_temperature_28_to_100cm",
            Self::SoilTemperature100To255cm => "soil_temperature_100_to_255cm",
            Self::SoilMoisture0To7cm => "soil_moisture_0_to_7cm",
            Self::SoilMoisture7To28cm => "soil_moisture_7_to_28cm",
            Self::SoilMoisture28To100cm => "soil_moisture_28_to_100cm",
            Self::SoilMoisture100To255cm => "soil_moisture_100_to_255cm",
            Self::ShortwaveRadiation => "shortwave_radiation",
            Self::Precipitation => "precipitation",
            Self::DirectRadiation => "direct_radiation",
        }
    }

    /// File name of the variable inside a domain directory.
    pub fn om_file_name(&self) -> &'static str {
        self.as_str()
    }

    /// Temperatures that get a lapse-rate correction to the target elevation.
    pub fn is_elevation_correctable(&self) -> bool {
        matches!(self, Self::Temperature2m | Self::Dewpoint2m)
    }

    /// Whether `domain` stores this variable.
    ///
    /// ERA5-Land wind, pressure, snowfall, radiation and precipitation are only
    /// interpolated from ERA5, so they are read from ERA5 directly.
    pub fn available_for_domain(&self, domain: CdsDomain) -> bool {
        match domain {
            CdsDomain::Era5 => true,
            CdsDomain::Era5Land => matches!(
                self,
                Self::Temperature2m
                    | Self::Dewpoint2m
                    | Self::SoilTemperature0To7cm
                    | Self::SoilTemperature7To28cm
                    | Self::SoilTemperature28To100cm
                    | Self::SoilTemperature100To255cm
                    | Self::SoilMoisture0To7cm
                    | Self::SoilMoisture7To28cm
                    | Self::SoilMoisture28To100cm
                    | Self::SoilMoisture100To255cm
            ),
        }
    }

    /// Scale factor of the fixed-point compression (values are stored as `round(v * s)`).
    pub fn scalefactor(&self) -> f32 {
        match self {
            Self::WindUComponent100m
            | Self::WindVComponent100m
            | Self::WindUComponent10m
            | Self::WindVComponent10m
            | Self::Windgusts10m => 10.0,
            Self::CloudcoverLow | Self::CloudcoverMid | Self::CloudcoverHigh => 1.0,
            Self::Dewpoint2m | Self::Temperature2m => 20.0,
            Self::PressureMsl => 0.1,
            Self::SnowfallWaterEquivalent | Self::Precipitation => 10.0,
            Self::SoilTemperature0To7cm
            | Self::SoilTemperature7To28cm
            | Self::SoilTemperature28To100cm
            | Self::SoilTemperature100To255cm => 20.0,
            Self::ShortwaveRadiation | Self::DirectRadiation => 1.0,
            Self::SoilMoisture0To7cm
            | Self::SoilMoisture7To28cm
            | Self::SoilMoisture28To100cm
            | Self::SoilMoisture100To255cm => 1000.0,
        }
    }

    pub fn unit(&self) -> SiUnit {
        match self {
            Self::WindUComponent100m
            | Self::WindVComponent100m
            | Self::WindUComponent10m
            | Self::WindVComponent10m
            | Self::Windgusts10m => SiUnit::MetrePerSecond,
            Self::Dewpoint2m | Self::Temperature2m => SiUnit::Celsius,
            Self::CloudcoverLow | Self::CloudcoverMid | Self::CloudcoverHigh => SiUnit::Percent,
            Self::PressureMsl => SiUnit::Pascal,
            Self::SnowfallWaterEquivalent | Self::Precipitation => SiUnit::Millimetre,
            Self::SoilTemperature0To7cm
            | Self::SoilTemperature7To28cm
            | Self::SoilTemperature28To100cm
            | Self::SoilTemperature100To255cm => SiUnit::Celsius,
            Self::ShortwaveRadiation | Self::DirectRadiation => SiUnit::WattPerSquareMetre,
            Self::SoilMoisture0To7cm
            | Self::SoilMoisture7To28cm
            | Self::SoilMoisture28To100cm
            | Self::SoilMoisture100To255cm => SiUnit::CubicMetrePerCubicMetre,
        }
    }
}

/// Quantities computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Era5VariableDerived {
    Windspeed10m,
    Windspeed100m,
    Winddirection10m,
    Winddirection100m,
    Relativehumidity2m,
    ApparentTemperature,
    VaporPressureDeficit,
    DiffuseRadiation,
    DirectNormalIrradiance,
    Et0FaoEvapotranspiration,
    SurfacePressure,
    Snowfall,
    Rain,
    Cloudcover,
    Weathercode,
}

use Era5HourlyVariable::{Derived as D, Raw as R};

impl Era5VariableDerived {
    pub const ALL: [Era5VariableDerived; 15] = [
        Self::Windspeed10m,
        Self::Windspeed100m,
        Self::Winddirection10m,
        Self::Winddirection100m,
        Self::Relativehumidity2m,
        Self::ApparentTemperature,
        Self::VaporPressureDeficit,
        Self::DiffuseRadiation,
        Self::DirectNormalIrradiance,
        Self::Et0FaoEvapotranspiration,
        Self::SurfacePressure,
        Self::Snowfall,
        Self::Rain,
        Self::Cloudcover,
        Self::Weathercode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windspeed10m => "windspeed_10m",
            Self::Windspeed100m => "windspeed_100m",
            Self::Winddirection10m => "winddirection_10m",
            Self::Winddirection100m => "winddirection_100m",
            Self::Relativehumidity2m => "relativehumidity_2m",
            Self::ApparentTemperature => "apparent_temperature",
            Self::VaporPressureDeficit => "vapor_pressure_deficit",
            Self::DiffuseRadiation => "diffuse_radiation",
            Self::DirectNormalIrradiance => "direct_normal_irradiance",
            Self::Et0FaoEvapotranspiration => "et0_fao_evapotranspiration",
            Self::SurfacePressure => "surface_pressure",
            Self::Snowfall => "snowfall",
            Self::Rain => "rain",
            Self::Cloudcover => "cloudcover",
            Self::Weathercode => "weathercode",
        }
    }

    /// Unit of the computed series.
    pub fn unit(&self) -> SiUnit {
        match self {
            Self::Windspeed10m | Self::Windspeed100m => SiUnit::MetrePerSecond,
            Self::Winddirection10m | Self::Winddirection100m => SiUnit::DegreeDirection,
            Self::Relativehumidity2m | Self::Cloudcover => SiUnit::Percent,
            Self::ApparentTemperature => SiUnit::Celsius,
            Self::VaporPressureDeficit => SiUnit::KiloPascal,
            Self::DiffuseRadiation | Self::DirectNormalIrradiance => SiUnit::WattPerSquareMetre,
            Self::Et0FaoEvapotranspiration | Self::Rain => SiUnit::Millimetre,
            Self::SurfacePressure => SiUnit::Pascal,
            Self::Snowfall => SiUnit::Centimetre,
            Self::Weathercode => SiUnit::WmoCode,
        }
    }

    /// Direct inputs of the formula. Derived inputs expand recursively.
    pub fn dependencies(&self) -> &'static [Era5HourlyVariable] {
        use Era5Variable::*;
        use Era5VariableDerived as V;
        match self {
            Self::Windspeed10m | Self::Winddirection10m => {
                &[R(WindUComponent10m), R(WindVComponent10m)]
            }
            Self::Windspeed100m | Self::Winddirection100m => {
                &[R(WindUComponent100m), R(WindVComponent100m)]
            }
            Self::Relativehumidity2m | Self::VaporPressureDeficit => {
                &[R(Temperature2m), R(Dewpoint2m)]
            }
            Self::ApparentTemperature => &[
                R(Temperature2m),
                D(V::Windspeed10m),
                D(V::Relativehumidity2m),
                R(ShortwaveRadiation),
                // Prefetched alongside shortwave, not read by the formula
                R(DirectRadiation),
            ],
            Self::DiffuseRadiation => &[R(ShortwaveRadiation), R(DirectRadiation)],
            Self::DirectNormalIrradiance => &[R(DirectRadiation)],
            Self::Et0FaoEvapotranspiration => &[
                R(ShortwaveRadiation),
                R(Temperature2m),
                D(V::Windspeed10m),
                R(Dewpoint2m),
            ],
            Self::SurfacePressure => &[R(Temperature2m), R(PressureMsl)],
            Self::Snowfall => &[R(SnowfallWaterEquivalent)],
            Self::Rain => &[R(Precipitation), R(SnowfallWaterEquivalent)],
            Self::Cloudcover => &[R(CloudcoverLow), R(CloudcoverMid), R(CloudcoverHigh)],
            Self::Weathercode => &[D(V::Cloudcover), R(Precipitation), D(V::Snowfall)],
        }
    }

    /// Transitive raw inputs, each listed once, in first-visit order.
    pub fn raw_dependencies(&self) -> Vec<Era5Variable> {
        fn visit(variable: Era5VariableDerived, out: &mut Vec<Era5Variable>) {
            for dependency in variable.dependencies() {
                match *dependency {
                    R(raw) => {
                        if !out.contains(&raw) {
                            out.push(raw);
                        }
                    }
                    D(derived) => visit(derived, out),
                }
            }
        }

        let mut out = Vec::new();
        visit(*self, &mut out);
        out
    }
}

/// A requested variable: either stored or derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Era5HourlyVariable {
    Raw(Era5Variable),
    Derived(Era5VariableDerived),
}

impl Era5HourlyVariable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw(v) => v.as_str(),
            Self::Derived(v) => v.as_str(),
        }
    }

    pub fn unit(&self) -> SiUnit {
        match self {
            Self::Raw(v) => v.unit(),
            Self::Derived(v) => v.unit(),
        }
    }

    /// Raw variables that must be decoded to produce this one.
    pub fn raw_dependencies(&self) -> Vec<Era5Variable> {
        match self {
            Self::Raw(v) => vec![*v],
            Self::Derived(v) => v.raw_dependencies(),
        }
    }
}

impl From<Era5Variable> for Era5HourlyVariable {
    fn from(v: Era5Variable) -> Self {
        Self::Raw(v)
    }
}

impl From<Era5VariableDerived> for Era5HourlyVariable {
    fn from(v: Era5VariableDerived) -> Self {
        Self::Derived(v)
    }
}

macro_rules! impl_variable_name {
    ($($ty:ty),+) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl From<$ty> for &'static str {
                fn from(v: $ty) -> Self {
                    v.as_str()
                }
            }

            impl TryFrom<String> for $ty {
                type Error = ReaderError;

                fn try_from(s: String) -> Result<Self, Self::Error> {
                    s.parse()
                }
            }
        )+
    };
}

impl_variable_name!(Era5Variable, Era5VariableDerived, Era5HourlyVariable);

impl FromStr for Era5Variable {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ReaderError::UnknownVariable(s.to_string()))
    }
}

impl FromStr for Era5VariableDerived {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ReaderError::UnknownVariable(s.to_string()))
    }
}

impl FromStr for Era5HourlyVariable {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Era5Variable>()
            .map(Self::Raw)
            .or_else(|_| s.parse::<Era5VariableDerived>().map(Self::Derived))
    }
}
