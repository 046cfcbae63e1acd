//! Storage access for the point read-path.
//!
//! Provides:
//! - The decode boundary to the compressed time-series store ([`StorageBackend`])
//! - A process-wide, single-flight LRU cache of decoded series ([`DecodeCache`])
//! - An in-memory fixed-precision backend ([`MemoryStore`])

pub mod backend;
pub mod decode_cache;
pub mod error;
pub mod key;
pub mod memory_store;

pub use backend::StorageBackend;
pub use decode_cache::{CacheStats, DecodeCache};
pub use error::{StorageError, StorageResult};
pub use key::StorageKey;
pub use memory_store::{quantize, MemoryStore};
