//! The decode boundary to the compressed time-series store.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::key::StorageKey;

/// A store that can decode fixed-precision series for a point.
///
/// Implementations own the file format and any I/O retry policy. A
/// successful decode returns exactly `key.time.count()` values; timesteps
/// the store does not cover are NaN. When nothing is stored for the key
/// the result is [`StorageError::NotFound`](crate::StorageError::NotFound).
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn decode(&self, key: &StorageKey) -> StorageResult<Vec<f32>>;
}
