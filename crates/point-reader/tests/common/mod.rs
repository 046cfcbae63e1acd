//! Store fixtures shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use point_reader::{CdsDomain, DomainPoint, Era5Reader, Era5Variable, ReaderConfig};
use storage::{DecodeCache, MemoryStore};
use test_utils::fixtures;
use weather_common::TimeRange;

/// Builds a [`MemoryStore`] the way ingestion would lay it out.
#[derive(Default)]
pub struct StoreBuilder {
    store: MemoryStore,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `values` for the fixture day.
    pub fn with(self, domain: CdsDomain, variable: Era5Variable, values: &[f32]) -> Self {
        self.with_range(domain, variable, fixtures::day_range(), values)
    }

    pub fn with_range(
        mut self,
        domain: CdsDomain,
        variable: Era5Variable,
        time: TimeRange,
        values: &[f32],
    ) -> Self {
        self.store
            .insert(
                domain.om_file_directory(),
                variable.om_file_name(),
                fixtures::POINT_INDEX,
                time,
                values,
                variable.scalefactor(),
            )
            .unwrap();
        self
    }

    /// Store a constant series for the fixture day.
    pub fn constant(self, domain: CdsDomain, variable: Era5Variable, value: f32) -> Self {
        let values = vec![value; fixtures::day_range().count()];
        self.with(domain, variable, &values)
    }

    pub fn build(self) -> Arc<MemoryStore> {
        Arc::new(self.store)
    }
}

/// Fixture grid point of `domain` in Zurich.
pub fn zurich(domain: CdsDomain) -> DomainPoint {
    DomainPoint::new(domain, fixtures::point_at(fixtures::locations::ZURICH))
}

pub fn reader(store: Arc<MemoryStore>, domain: CdsDomain) -> Era5Reader {
    reader_with_config(store, domain, ReaderConfig::default())
}

pub fn reader_with_config(
    store: Arc<MemoryStore>,
    domain: CdsDomain,
    config: ReaderConfig,
) -> Era5Reader {
    let cache = DecodeCache::new(store, 256);
    Era5Reader::new(cache, domain, zurich(domain).point, config)
}
