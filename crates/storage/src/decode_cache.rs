//! Process-wide LRU cache of decoded series with single-flight fills.
//!
//! Every key owns a `OnceCell` slot. The first caller to reach an empty slot
//! runs the backend decode; concurrent callers for the same key await that
//! same fill instead of decoding again. Failed decodes leave the slot empty.
//!
//! Slots being filled are pinned outside the LRU and only join it once they
//! hold a value, so eviction never splits one key across two fills.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lru::LruCache;
use tokio::sync::OnceCell;

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use crate::key::StorageKey;

type Slot = Arc<OnceCell<Arc<[f32]>>>;

/// Statistics about the decode cache.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Backend decode calls actually issued.
    pub decodes: u64,
    /// Filled series held by the LRU.
    pub entries: usize,
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 - 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    decodes: AtomicU64,
    evictions: AtomicU64,
}

struct Slots {
    filled: LruCache<StorageKey, Slot>,
    pending: HashMap<StorageKey, Slot>,
}

/// Shared decode cache in front of a [`StorageBackend`].
///
/// Cloning is cheap and clones share the same cache.
#[derive(Clone)]
pub struct DecodeCache {
    backend: Arc<dyn StorageBackend>,
    slots: Arc<Mutex<Slots>>,
    counters: Arc<Counters>,
}

impl DecodeCache {
    /// Create a cache holding at most `capacity` decoded series.
    pub fn new(backend: Arc<dyn StorageBackend>, capacity: usize) -> Self {
        let cache_size = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            backend,
            slots: Arc::new(Mutex::new(Slots {
                filled: LruCache::new(cache_size),
                pending: HashMap::new(),
            })),
            counters: Arc::new(Counters::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up the filled or pending slot for `key`, or pin a new one.
    fn slot(&self, key: &StorageKey) -> Slot {
        let mut slots = self.lock();
        if let Some(slot) = slots.filled.get(key) {
            return slot.clone();
        }
        slots
            .pending
            .entry(key.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    /// Unpin `slot` after a fill attempt, moving it into the LRU if filled.
    ///
    /// Every caller that awaited the slot settles it; only the first one
    /// still finds it pending.
    fn settle(&self, key: &StorageKey, slot: &Slot) {
        let mut slots = self.lock();
        let pinned = slots
            .pending
            .get(key)
            .is_some_and(|pending| Arc::ptr_eq(pending, slot));
        if !pinned {
            return;
        }
        slots.pending.remove(key);

        if !slot.initialized() {
            return;
        }
        if let Some((evicted, _)) = slots.filled.push(key.clone(), slot.clone()) {
            if &evicted != key {
                self.counters.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    async fn fill(
        backend: &dyn StorageBackend,
        counters: &Counters,
        key: &StorageKey,
    ) -> StorageResult<Arc<[f32]>> {
        counters.decodes.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(key = %key, "Decoding series");

        let values = backend.decode(key).await?;
        let expected = key.time.count();
        if values.len() != expected {
            return Err(StorageError::LengthMismatch {
                key: key.clone(),
                expected,
                actual: values.len(),
            });
        }
        Ok(Arc::from(values))
    }

    async fn fill_slot(&self, key: &StorageKey, slot: &Slot) -> StorageResult<Arc<[f32]>> {
        let result = slot
            .get_or_try_init(|| Self::fill(self.backend.as_ref(), &self.counters, key))
            .await
            .cloned();
        self.settle(key, slot);
        result
    }

    /// Decode a series, serving it from cache when already filled.
    pub async fn decode(&self, key: &StorageKey) -> StorageResult<Arc<[f32]>> {
        let slot = self.slot(key);

        if let Some(values) = slot.get() {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(values.clone());
        }
        self.counters.misses.fetch_add(1, Ordering::Relaxed);

        self.fill_slot(key, &slot).await
    }

    /// Start filling `key` in the background.
    ///
    /// Fire and forget: failures are logged and the slot stays empty, so a
    /// later [`decode`](Self::decode) reports the error. Without a tokio
    /// runtime this is a no-op.
    pub fn prefetch(&self, key: StorageKey) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(key = %key, "No runtime, skipping prefetch");
            return;
        };

        let slot = self.slot(&key);
        if slot.initialized() {
            return;
        }

        let cache = self.clone();
        handle.spawn(async move {
            if let Err(e) = cache.fill_slot(&key, &slot).await {
                tracing::warn!(key = %key, error = %e, "Failed to prefetch series");
            }
        });
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let entries = self.lock().filled.len();
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            decodes: self.counters.decodes.load(Ordering::Relaxed),
            entries,
            evictions: self.counters.evictions.load(Ordering::Relaxed),
        }
    }

    /// Clear all filled entries from the cache.
    ///
    /// Fills in flight are kept and land in the cache when done. Returns the
    /// number of entries dropped.
    pub fn clear(&self) -> usize {
        let mut slots = self.lock();
        let entries = slots.filled.len();
        slots.filled.clear();
        entries
    }
}
