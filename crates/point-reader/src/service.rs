//! High-level point data service.
//!
//! `PointDataService` is the process-wide entry point. It owns the shared
//! decode cache and builds a fresh mixer of per-request readers for every
//! query, so only the cache outlives a request.
//!
//! # Example
//!
//! ```rust,ignore
//! let service = PointDataService::new(backend, ReaderConfig::from_env())?;
//!
//! let query = PointQuery::new(time)
//!     .variables([temperature, apparent_temperature])
//!     .domain(DomainPoint::from_grid(CdsDomain::Era5Land, land_index, 412.0)?)
//!     .domain(DomainPoint::from_grid(CdsDomain::Era5, era5_index, 398.0)?);
//!
//! let response = service.query(&query).await;
//! ```

use std::sync::Arc;

use storage::{CacheStats, DecodeCache, StorageBackend};

use crate::config::ReaderConfig;
use crate::error::{ReaderError, Result};
use crate::mixer::Era5Mixer;
use crate::query::{DomainPoint, PointQuery, PointResponse, VariableResult};
use crate::reader::Era5Reader;

/// Answers point queries against a storage backend.
pub struct PointDataService {
    storage: DecodeCache,
    config: ReaderConfig,
}

impl PointDataService {
    /// Create a service with a decode cache sized from `config`.
    pub fn new(backend: Arc<dyn StorageBackend>, config: ReaderConfig) -> Result<Self> {
        config
            .validate()
            .map_err(ReaderError::InvalidConfiguration)?;
        let storage = DecodeCache::new(backend, config.decode_cache_entries);
        Ok(Self { storage, config })
    }

    /// Create a service configured from environment variables.
    pub fn from_env(backend: Arc<dyn StorageBackend>) -> Result<Self> {
        Self::new(backend, ReaderConfig::from_env())
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Build a mixer over `domains`, most preferred first.
    pub fn mixer(&self, domains: &[DomainPoint], target_elevation: Option<f32>) -> Era5Mixer {
        let readers = domains
            .iter()
            .map(|d| {
                Era5Reader::new(self.storage.clone(), d.domain, d.point, self.config.clone())
                    .with_target_elevation(target_elevation)
            })
            .collect();
        Era5Mixer::new(readers)
    }

    /// Resolve every variable of `query`.
    ///
    /// All variables are prefetched first. Each variable then succeeds or
    /// fails on its own; one failure never aborts the others.
    pub async fn query(&self, query: &PointQuery) -> PointResponse {
        tracing::info!(
            variables = query.variables.len(),
            domains = query.domains.len(),
            time = %query.time,
            "Point query"
        );

        let mixer = self.mixer(&query.domains, query.target_elevation);
        for variable in &query.variables {
            mixer.prefetch(*variable, &query.time);
        }

        let mut results = Vec::with_capacity(query.variables.len());
        for variable in &query.variables {
            let result = mixer.get(*variable, &query.time).await;
            if let Err(e) = &result {
                tracing::warn!(variable = %variable, error = %e, "Variable unavailable");
            }
            results.push(VariableResult {
                variable: *variable,
                result,
            });
        }

        let stats = self.storage.stats();
        tracing::debug!(
            entries = stats.entries,
            decodes = stats.decodes,
            hit_rate = stats.hit_rate(),
            "Decode cache after query"
        );

        PointResponse {
            time: query.time,
            results,
        }
    }

    /// Get decode cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.storage.stats()
    }

    /// Drop all cached series. Returns the number of entries dropped.
    pub fn clear_cache(&self) -> usize {
        self.storage.clear()
    }
}
