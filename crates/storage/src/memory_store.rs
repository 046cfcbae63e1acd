//! In-memory fixed-precision series store.
//!
//! Mirrors what the compressed on-disk store returns: values are quantised
//! to the variable's scale factor on write, timesteps outside the stored
//! coverage decode as NaN, and keys with no overlapping data are NotFound.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use weather_common::TimeRange;

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use crate::key::StorageKey;

/// (domain, variable, point)
type SeriesId = (String, String, usize);

#[derive(Debug, Clone)]
struct StoredSeries {
    time: TimeRange,
    values: Vec<f32>,
}

/// Quantise a value to the precision representable with `scalefactor`.
pub fn quantize(value: f32, scalefactor: f32) -> f32 {
    if !value.is_finite() || scalefactor <= 0.0 {
        return value;
    }
    (value * scalefactor).round() / scalefactor
}

/// Series store held entirely in memory.
///
/// Populate it with [`MemoryStore::insert`] before sharing it behind an
/// `Arc`; decoding only needs shared access.
#[derive(Debug, Default)]
pub struct MemoryStore {
    series: HashMap<SeriesId, StoredSeries>,
    decode_calls: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a series, quantised with `scalefactor`.
    ///
    /// Replaces any series previously stored for the same id.
    pub fn insert(
        &mut self,
        domain: &str,
        variable: &str,
        point: usize,
        time: TimeRange,
        values: &[f32],
        scalefactor: f32,
    ) -> StorageResult<()> {
        if values.len() != time.count() {
            return Err(StorageError::LengthMismatch {
                key: StorageKey::new(domain, variable, point, time),
                expected: time.count(),
                actual: values.len(),
            });
        }

        let values = values.iter().map(|&v| quantize(v, scalefactor)).collect();
        self.series.insert(
            (domain.to_string(), variable.to_string(), point),
            StoredSeries { time, values },
        );
        Ok(())
    }

    /// Number of decode calls served so far.
    pub fn decode_calls(&self) -> u64 {
        self.decode_calls.load(Ordering::Relaxed)
    }

    /// Number of stored series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[async_trait]
impl StorageBackend for MemoryStore {
    async fn decode(&self, key: &StorageKey) -> StorageResult<Vec<f32>> {
        self.decode_calls.fetch_add(1, Ordering::Relaxed);

        let id = (key.domain.clone(), key.variable.clone(), key.point);
        let stored = self
            .series
            .get(&id)
            .ok_or_else(|| StorageError::NotFound(key.clone()))?;

        if stored.time.dt_seconds != key.time.dt_seconds {
            return Err(StorageError::InvalidRange {
                key: key.clone(),
                message: format!(
                    "stored step is {}s, requested {}s",
                    stored.time.dt_seconds, key.time.dt_seconds
                ),
            });
        }

        if !stored.time.overlaps(&key.time) {
            return Err(StorageError::NotFound(key.clone()));
        }

        let values = key
            .time
            .iter()
            .map(|t| {
                stored
                    .time
                    .index_of(t)
                    .map(|i| stored.values[i])
                    .unwrap_or(f32::NAN)
            })
            .collect();

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn range(start_hour: u32, count: usize) -> TimeRange {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, start_hour, 0, 0).unwrap();
        TimeRange::hourly(start, count).unwrap()
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(21.37, 20.0), 21.35);
        assert_eq!(quantize(101_324.0, 0.1), 101_320.0);
        assert!(quantize(f32::NAN, 10.0).is_nan());
    }

    #[test]
    fn test_insert_rejects_wrong_length() {
        let mut store = MemoryStore::new();
        let result = store.insert("era5", "temperature_2m", 0, range(0, 4), &[1.0, 2.0], 20.0);
        assert!(matches!(result, Err(StorageError::LengthMismatch { .. })));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_decode_partial_overlap_fills_nan() {
        let mut store = MemoryStore::new();
        store
            .insert("era5", "precipitation", 7, range(0, 4), &[0.1, 0.2, 0.3, 0.4], 10.0)
            .unwrap();

        let key = StorageKey::new("era5", "precipitation", 7, range(2, 4));
        let values = store.decode(&key).await.unwrap();

        assert_eq!(values.len(), 4);
        assert_eq!(values[0], 0.3);
        assert_eq!(values[1], 0.4);
        assert!(values[2].is_nan());
        assert!(values[3].is_nan());
        assert_eq!(store.decode_calls(), 1);
    }

    #[tokio::test]
    async fn test_decode_not_found() {
        let mut store = MemoryStore::new();
        store
            .insert("era5", "precipitation", 7, range(0, 4), &[0.0; 4], 10.0)
            .unwrap();

        let other_point = StorageKey::new("era5", "precipitation", 8, range(0, 4));
        assert!(store.decode(&other_point).await.unwrap_err().is_not_found());

        let disjoint = StorageKey::new("era5", "precipitation", 7, range(10, 4));
        assert!(store.decode(&disjoint).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_decode_step_mismatch() {
        let mut store = MemoryStore::new();
        store
            .insert("era5", "precipitation", 7, range(0, 6), &[0.0; 6], 10.0)
            .unwrap();

        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let three_hourly = TimeRange::with_count(start, 2, 3 * 3600).unwrap();
        let key = StorageKey::new("era5", "precipitation", 7, three_hourly);

        assert!(matches!(
            store.decode(&key).await,
            Err(StorageError::InvalidRange { .. })
        ));
    }
}
