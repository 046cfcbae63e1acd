//! Domain mixing: preference order, per-timestep fallback and error handling.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{reader, zurich, StoreBuilder};
use point_reader::{
    CdsDomain, Era5HourlyVariable, Era5Mixer, Era5Reader, Era5Variable, Era5VariableDerived,
    ReaderConfig, ReaderError,
};
use storage::{DecodeCache, StorageBackend, StorageError, StorageKey, StorageResult};
use test_utils::{constant_series, fixtures, with_gaps};

use CdsDomain::{Era5, Era5Land};

const TEMPERATURE: Era5HourlyVariable = Era5HourlyVariable::Raw(Era5Variable::Temperature2m);

fn land_first(store: Arc<storage::MemoryStore>) -> Era5Mixer {
    Era5Mixer::new(vec![reader(store.clone(), Era5Land), reader(store, Era5)])
}

#[tokio::test]
async fn test_preferred_domain_wins_when_complete() {
    let store = StoreBuilder::new()
        .constant(Era5Land, Era5Variable::Temperature2m, 15.0)
        .constant(Era5, Era5Variable::Temperature2m, 20.0)
        .build();
    let mixer = land_first(store.clone());

    let series = mixer.get(TEMPERATURE, &fixtures::day_range()).await.unwrap();

    assert!(series.data.iter().all(|&v| v == 15.0));
    // ERA5 never read
    assert_eq!(store.decode_calls(), 1);
}

#[tokio::test]
async fn test_fallback_fills_missing_timesteps_only() {
    let store = StoreBuilder::new()
        .with(
            Era5Land,
            Era5Variable::Temperature2m,
            &with_gaps(constant_series(24, 15.0), &[5, 6, 7]),
        )
        .constant(Era5, Era5Variable::Temperature2m, 20.0)
        .build();
    let mixer = land_first(store);

    let series = mixer.get(TEMPERATURE, &fixtures::day_range()).await.unwrap();

    for (i, value) in series.data.iter().enumerate() {
        let expected = if (5..=7).contains(&i) { 20.0 } else { 15.0 };
        assert_eq!(*value, expected, "timestep {}", i);
    }
}

#[tokio::test]
async fn test_fallback_when_domain_does_not_carry_variable() {
    let store = StoreBuilder::new()
        .constant(Era5, Era5Variable::Precipitation, 0.4)
        .constant(Era5, Era5Variable::SnowfallWaterEquivalent, 0.1)
        .build();
    let mixer = land_first(store);
    let time = fixtures::day_range();

    let precipitation = mixer
        .get(Era5HourlyVariable::Raw(Era5Variable::Precipitation), &time)
        .await
        .unwrap();
    assert_eq!(precipitation.data[0], 0.4);

    // Land fails with DependencyUnavailable, ERA5 answers
    let rain = mixer
        .get(Era5HourlyVariable::Derived(Era5VariableDerived::Rain), &time)
        .await
        .unwrap();
    assert!((rain.data[0] - 0.3).abs() < 1e-6);
}

#[tokio::test]
async fn test_uncovered_timestep_is_not_found() {
    let store = StoreBuilder::new()
        .with(
            Era5Land,
            Era5Variable::Temperature2m,
            &with_gaps(constant_series(24, 15.0), &[3, 9]),
        )
        .with(
            Era5,
            Era5Variable::Temperature2m,
            &with_gaps(constant_series(24, 20.0), &[9]),
        )
        .build();
    let mixer = land_first(store);

    let err = mixer
        .get(TEMPERATURE, &fixtures::day_range())
        .await
        .unwrap_err();
    assert!(matches!(err, ReaderError::NotFound { .. }));
}

#[tokio::test]
async fn test_no_domain_has_data() {
    let mixer = land_first(StoreBuilder::new().build());

    let err = mixer
        .get(TEMPERATURE, &fixtures::day_range())
        .await
        .unwrap_err();
    assert!(matches!(err, ReaderError::NotFound { .. }));

    let empty = Era5Mixer::new(Vec::new());
    let err = empty
        .get(TEMPERATURE, &fixtures::day_range())
        .await
        .unwrap_err();
    assert!(matches!(err, ReaderError::NotFound { .. }));
}

#[tokio::test]
async fn test_prefetch_skips_domains_without_variable() {
    let store = StoreBuilder::new()
        .constant(Era5, Era5Variable::Precipitation, 1.0)
        .build();
    let mixer = land_first(store.clone());
    let time = fixtures::day_range();
    let precipitation = Era5HourlyVariable::Raw(Era5Variable::Precipitation);

    mixer.prefetch(precipitation, &time);
    mixer.prefetch(precipitation, &time);
    mixer.get(precipitation, &time).await.unwrap();

    assert_eq!(store.decode_calls(), 1);
}

/// Backend whose storage is unreachable.
struct BrokenBackend;

#[async_trait]
impl StorageBackend for BrokenBackend {
    async fn decode(&self, _key: &StorageKey) -> StorageResult<Vec<f32>> {
        Err(StorageError::backend("connection reset"))
    }
}

#[tokio::test]
async fn test_storage_failure_is_not_masked_by_fallback() {
    let broken = DecodeCache::new(Arc::new(BrokenBackend), 16);
    let healthy = StoreBuilder::new()
        .constant(Era5, Era5Variable::Temperature2m, 20.0)
        .build();

    let config = ReaderConfig {
        prefetch_enabled: false,
        ..Default::default()
    };
    let mixer = Era5Mixer::new(vec![
        Era5Reader::new(broken, Era5Land, zurich(Era5Land).point, config),
        reader(healthy, Era5),
    ]);

    let err = mixer
        .get(TEMPERATURE, &fixtures::day_range())
        .await
        .unwrap_err();
    assert!(matches!(err, ReaderError::Storage(_)));
    assert!(!err.is_recoverable());
}
