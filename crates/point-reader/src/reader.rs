//! Per-request reader for one grid point of one domain.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use storage::{DecodeCache, StorageError, StorageKey};
use tokio::sync::RwLock;
use weather_common::{GridPoint, TimeRange};

use crate::catalog::{CdsDomain, Era5HourlyVariable, Era5Variable};
use crate::config::ReaderConfig;
use crate::error::{ReaderError, Result};
use crate::meteorology::TEMPERATURE_LAPSE_RATE;
use crate::types::ValueSeries;

/// Reads raw and derived series for a single grid point of one domain.
///
/// A reader lives for one request. Decoded raw series are kept for its
/// lifetime, so repeated reads and shared dependencies cost one decode.
pub struct Era5Reader {
    domain: CdsDomain,
    point: GridPoint,
    target_elevation: Option<f32>,
    storage: DecodeCache,
    config: ReaderConfig,
    series: RwLock<HashMap<(Era5Variable, TimeRange), ValueSeries>>,
    prefetched: Mutex<HashSet<(Era5HourlyVariable, TimeRange)>>,
}

impl Era5Reader {
    pub fn new(
        storage: DecodeCache,
        domain: CdsDomain,
        point: GridPoint,
        config: ReaderConfig,
    ) -> Self {
        Self {
            domain,
            point,
            target_elevation: None,
            storage,
            config,
            series: RwLock::new(HashMap::new()),
            prefetched: Mutex::new(HashSet::new()),
        }
    }

    /// Correct temperatures to `elevation` metres instead of the cell elevation.
    pub fn with_target_elevation(mut self, elevation: Option<f32>) -> Self {
        self.target_elevation = elevation.filter(|e| !e.is_nan());
        self
    }

    pub fn domain(&self) -> CdsDomain {
        self.domain
    }

    pub fn point(&self) -> &GridPoint {
        &self.point
    }

    pub(crate) fn config(&self) -> &ReaderConfig {
        &self.config
    }

    fn storage_key(&self, variable: Era5Variable, time: &TimeRange) -> StorageKey {
        StorageKey::new(
            self.domain.om_file_directory(),
            variable.om_file_name(),
            self.point.index,
            *time,
        )
    }

    /// Mark `(variable, time)` as prefetched. Returns false if it already was.
    pub(crate) fn mark_prefetched(&self, variable: Era5HourlyVariable, time: &TimeRange) -> bool {
        self.prefetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((variable, *time))
    }

    /// Start decoding a raw variable in the background.
    ///
    /// Skipped for variables the domain does not carry.
    pub fn prefetch_raw(&self, variable: Era5Variable, time: &TimeRange) {
        if !self.config.prefetch_enabled || !variable.available_for_domain(self.domain) {
            return;
        }
        if !self.mark_prefetched(Era5HourlyVariable::Raw(variable), time) {
            return;
        }
        self.storage.prefetch(self.storage_key(variable, time));
    }

    /// Read a raw variable, elevation corrected where applicable.
    pub async fn get_raw(&self, variable: Era5Variable, time: &TimeRange) -> Result<ValueSeries> {
        if !variable.available_for_domain(self.domain) {
            return Err(ReaderError::not_found(
                variable,
                format!("not available in {}", self.domain),
            ));
        }
        if time.dt_seconds % self.domain.dt_seconds() != 0 {
            return Err(ReaderError::invalid_configuration(format!(
                "{}s step is not a multiple of the {}s step of {}",
                time.dt_seconds,
                self.domain.dt_seconds(),
                self.domain
            )));
        }

        let cache_key = (variable, *time);
        if let Some(series) = self.series.read().await.get(&cache_key) {
            tracing::debug!(
                domain = %self.domain,
                variable = %variable,
                "Series cache hit"
            );
            return Ok(series.clone());
        }

        let key = self.storage_key(variable, time);
        let values = self.storage.decode(&key).await.map_err(|e| match e {
            StorageError::NotFound(key) => ReaderError::not_found(
                variable,
                format!("no data in {} for point {} [{}]", self.domain, key.point, key.time),
            ),
            other => ReaderError::Storage(other),
        })?;

        let mut data = values.to_vec();
        self.correct_elevation(variable, &mut data);
        let series = ValueSeries::new(data, variable.unit());

        self.series.write().await.insert(cache_key, series.clone());
        Ok(series)
    }

    /// Lapse-rate correction from the cell elevation to the target elevation.
    fn correct_elevation(&self, variable: Era5Variable, data: &mut [f32]) {
        let Some(target) = self.target_elevation else {
            return;
        };
        let model = self.point.elevation;
        if !variable.is_elevation_correctable() || model.is_nan() || model == target {
            return;
        }

        let offset = (model - target) * TEMPERATURE_LAPSE_RATE;
        for value in data.iter_mut() {
            *value += offset;
        }
    }

    /// Hint that `variable` will be read for `time`.
    ///
    /// Derived variables expand to their dependencies. Each (variable, time)
    /// is expanded at most once per reader.
    pub fn prefetch(&self, variable: Era5HourlyVariable, time: &TimeRange) {
        match variable {
            Era5HourlyVariable::Raw(raw) => self.prefetch_raw(raw, time),
            Era5HourlyVariable::Derived(derived) => self.prefetch_derived(derived, time),
        }
    }

    /// Read a raw or derived variable.
    pub async fn get(&self, variable: Era5HourlyVariable, time: &TimeRange) -> Result<ValueSeries> {
        match variable {
            Era5HourlyVariable::Raw(raw) => self.get_raw(raw, time).await,
            Era5HourlyVariable::Derived(derived) => self.get_derived(derived, time).await,
        }
    }
}

impl std::fmt::Debug for Era5Reader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Era5Reader")
            .field("domain", &self.domain)
            .field("point", &self.point)
            .field("target_elevation", &self.target_elevation)
            .finish()
    }
}
