//! Derived variable engine.
//!
//! Derived variables are computed from their dependencies on every read.
//! Dependencies may themselves be derived, so reads recurse through boxed
//! futures. Raw reads are cached by the reader, which makes shared inputs
//! (e.g. temperature for both humidity and ET0) decode once.

use futures::future::{BoxFuture, FutureExt};
use weather_common::{SiUnit, TimeRange};

use crate::catalog::{Era5HourlyVariable, Era5Variable, Era5VariableDerived};
use crate::error::{ReaderError, Result};
use crate::meteorology::{self, Et0Input};
use crate::reader::Era5Reader;
use crate::types::{zip_n, ValueSeries};
use crate::{weather_code, zensun};

impl Era5Reader {
    /// Prefetch every raw input of `variable`.
    ///
    /// Sub-dependencies shared between variables are expanded once.
    pub fn prefetch_derived(&self, variable: Era5VariableDerived, time: &TimeRange) {
        if !self.config().prefetch_enabled {
            return;
        }
        if !self.mark_prefetched(Era5HourlyVariable::Derived(variable), time) {
            return;
        }
        for dependency in variable.dependencies() {
            self.prefetch(*dependency, time);
        }
    }

    /// Read an input of `variable`, attributing missing data to the dependency.
    async fn input(
        &self,
        variable: Era5VariableDerived,
        dependency: Era5HourlyVariable,
        time: &TimeRange,
    ) -> Result<ValueSeries> {
        self.get(dependency, time).await.map_err(|e| match e {
            ReaderError::NotFound { .. } => ReaderError::DependencyUnavailable {
                variable: variable.to_string(),
                dependency: dependency.to_string(),
                domain: self.domain(),
                source: Box::new(e),
            },
            other => other,
        })
    }

    async fn raw(
        &self,
        variable: Era5VariableDerived,
        dependency: Era5Variable,
        time: &TimeRange,
    ) -> Result<ValueSeries> {
        self.input(variable, Era5HourlyVariable::Raw(dependency), time)
            .await
    }

    async fn derived(
        &self,
        variable: Era5VariableDerived,
        dependency: Era5VariableDerived,
        time: &TimeRange,
    ) -> Result<ValueSeries> {
        self.input(variable, Era5HourlyVariable::Derived(dependency), time)
            .await
    }

    /// Compute a derived variable.
    pub fn get_derived<'a>(
        &'a self,
        variable: Era5VariableDerived,
        time: &'a TimeRange,
    ) -> BoxFuture<'a, Result<ValueSeries>> {
        async move {
            // All raw inputs start decoding before the first blocking read
            self.prefetch_derived(variable, time);
            tracing::debug!(
                domain = %self.domain(),
                variable = %variable,
                time = %time,
                "Computing derived variable"
            );
            self.compute(variable, time).await
        }
        .boxed()
    }

    async fn compute(
        &self,
        variable: Era5VariableDerived,
        time: &TimeRange,
    ) -> Result<ValueSeries> {
        use Era5Variable as R;
        use Era5VariableDerived as D;

        let unit = variable.unit();
        match variable {
            D::Windspeed10m | D::Windspeed100m | D::Winddirection10m | D::Winddirection100m => {
                let (u, v) = match variable {
                    D::Windspeed10m | D::Winddirection10m => {
                        (R::WindUComponent10m, R::WindVComponent10m)
                    }
                    _ => (R::WindUComponent100m, R::WindVComponent100m),
                };
                let u = self.raw(variable, u, time).await?;
                let v = self.raw(variable, v, time).await?;
                u.expect_unit(SiUnit::MetrePerSecond)?;
                let formula = match variable {
                    D::Windspeed10m | D::Windspeed100m => meteorology::windspeed,
                    _ => meteorology::wind_direction,
                };
                u.zip_with(&v, unit, formula)
            }
            D::Relativehumidity2m | D::VaporPressureDeficit => {
                let temperature = self.raw(variable, R::Temperature2m, time).await?;
                let dewpoint = self.raw(variable, R::Dewpoint2m, time).await?;
                temperature.expect_unit(SiUnit::Celsius)?;
                let formula = match variable {
                    D::Relativehumidity2m => meteorology::relative_humidity,
                    _ => meteorology::vapor_pressure_deficit,
                };
                temperature.zip_with(&dewpoint, unit, formula)
            }
            D::ApparentTemperature => {
                let temperature = self.raw(variable, R::Temperature2m, time).await?;
                let windspeed = self.derived(variable, D::Windspeed10m, time).await?;
                let humidity = self.derived(variable, D::Relativehumidity2m, time).await?;
                let shortwave = self.raw(variable, R::ShortwaveRadiation, time).await?;

                temperature.expect_unit(SiUnit::Celsius)?;
                windspeed.expect_unit(SiUnit::MetrePerSecond)?;
                humidity.expect_unit(SiUnit::Percent)?;
                shortwave.expect_unit(SiUnit::WattPerSquareMetre)?;

                let data = zip_n(
                    [
                        temperature.data.as_slice(),
                        humidity.data.as_slice(),
                        windspeed.data.as_slice(),
                        shortwave.data.as_slice(),
                    ],
                    |[t, rh, ws, sw]| meteorology::apparent_temperature(t, rh, ws, sw),
                );
                Ok(ValueSeries::new(data, unit))
            }
            D::DiffuseRadiation => {
                let shortwave = self.raw(variable, R::ShortwaveRadiation, time).await?;
                let direct = self.raw(variable, R::DirectRadiation, time).await?;
                shortwave.zip_with(&direct, unit, |sw, dr| sw - dr)
            }
            D::DirectNormalIrradiance => {
                let direct = self.raw(variable, R::DirectRadiation, time).await?;
                direct.expect_unit(SiUnit::WattPerSquareMetre)?;
                let point = self.point();
                let data = zensun::calculate_backwards_dni(
                    &direct.data,
                    point.latitude,
                    point.longitude,
                    time,
                );
                Ok(ValueSeries::new(data, unit))
            }
            D::Et0FaoEvapotranspiration => self.et0(time).await,
            D::SurfacePressure => {
                let temperature = self.raw(variable, R::Temperature2m, time).await?;
                let pressure = self.raw(variable, R::PressureMsl, time).await?;
                temperature.expect_unit(SiUnit::Celsius)?;
                let elevation = self.point().elevation;
                let data = zip_n(
                    [temperature.data.as_slice(), pressure.data.as_slice()],
                    |[t, p]| meteorology::surface_pressure(t, p, elevation),
                );
                Ok(ValueSeries::new(data, pressure.unit))
            }
            D::Snowfall => {
                let water = self.raw(variable, R::SnowfallWaterEquivalent, time).await?;
                water.expect_unit(SiUnit::Millimetre)?;
                water
                    .map(SiUnit::Millimetre, |swe| {
                        swe * meteorology::SNOW_TO_WATER_DEPTH_RATIO
                    })
                    .convert(unit)
            }
            D::Rain => {
                let precipitation = self.raw(variable, R::Precipitation, time).await?;
                let water = self.raw(variable, R::SnowfallWaterEquivalent, time).await?;
                precipitation.zip_with(&water, precipitation.unit, |p, swe| {
                    meteorology::clamp_min(p - swe, 0.0)
                })
            }
            D::Cloudcover => {
                let low = self.raw(variable, R::CloudcoverLow, time).await?;
                let mid = self.raw(variable, R::CloudcoverMid, time).await?;
                let high = self.raw(variable, R::CloudcoverHigh, time).await?;
                for layer in [&low, &mid, &high] {
                    layer.expect_unit(SiUnit::Percent)?;
                }
                let law = self.config().cloud_cover_law;
                let data = zip_n(
                    [low.data.as_slice(), mid.data.as_slice(), high.data.as_slice()],
                    |[l, m, h]| meteorology::cloud_cover_total(l, m, h, law),
                );
                Ok(ValueSeries::new(data, unit))
            }
            D::Weathercode => {
                let cloudcover = self.derived(variable, D::Cloudcover, time).await?;
                let precipitation = self.raw(variable, R::Precipitation, time).await?;
                let snowfall = self.derived(variable, D::Snowfall, time).await?;
                precipitation.expect_unit(SiUnit::Millimetre)?;
                snowfall.expect_unit(SiUnit::Centimetre)?;
                let data = weather_code::calculate_series(
                    &cloudcover.data,
                    &precipitation.data,
                    &snowfall.data,
                    time.dt_hours(),
                );
                Ok(ValueSeries::new(data, unit))
            }
        }
    }

    /// Hourly FAO-56 reference evapotranspiration.
    ///
    /// The hourly constants of the formula only hold for one-hour steps.
    async fn et0(&self, time: &TimeRange) -> Result<ValueSeries> {
        let variable = Era5VariableDerived::Et0FaoEvapotranspiration;
        if time.dt_seconds != 3600 {
            return Err(ReaderError::invalid_configuration(format!(
                "{} requires a 3600s time step, got {}s",
                variable, time.dt_seconds
            )));
        }

        let shortwave = self
            .raw(variable, Era5Variable::ShortwaveRadiation, time)
            .await?;
        let temperature = self.raw(variable, Era5Variable::Temperature2m, time).await?;
        let windspeed = self
            .derived(variable, Era5VariableDerived::Windspeed10m, time)
            .await?;
        let dewpoint = self.raw(variable, Era5Variable::Dewpoint2m, time).await?;

        shortwave.expect_unit(SiUnit::WattPerSquareMetre)?;
        temperature.expect_unit(SiUnit::Celsius)?;
        dewpoint.expect_unit(SiUnit::Celsius)?;
        windspeed.expect_unit(SiUnit::MetrePerSecond)?;

        let point = self.point();
        let extraterrestrial =
            zensun::extraterrestrial_radiation_backwards(point.latitude, point.longitude, time);
        let elevation = point.elevation;

        let data = zip_n(
            [
                temperature.data.as_slice(),
                dewpoint.data.as_slice(),
                windspeed.data.as_slice(),
                shortwave.data.as_slice(),
                extraterrestrial.as_slice(),
            ],
            |[t, td, ws, sw, exrad]| {
                meteorology::et0_evapotranspiration_hourly(Et0Input {
                    temperature: t,
                    dewpoint: td,
                    windspeed_10m: ws,
                    shortwave_radiation: sw,
                    extraterrestrial_radiation: exrad,
                    elevation,
                })
            },
        );
        Ok(ValueSeries::new(data, variable.unit()))
    }
}
