//! Point time-series read path for ERA5 reanalysis data.
//!
//! This crate turns stored fixed-precision series into unit-tagged point
//! time series:
//!
//! - **Catalog**: closed enums of raw and derived variables with their
//!   units, scale factors and domain availability
//! - **Derivation**: derived variables computed on demand from their
//!   dependencies, which are prefetched before the first read
//! - **Mixing**: several domains (ERA5-Land, ERA5) combined per timestep,
//!   most preferred first
//!
//! # Architecture
//!
//! ```text
//! PointQuery
//!      │
//!      ▼
//! PointDataService::query
//!      │
//!      ├─► Era5Mixer (one per request)
//!      │        │
//!      │        ├─► Era5Reader (era5_land) ─┐
//!      │        │                           │  prefetch / get
//!      │        └─► Era5Reader (era5)    ───┤
//!      │                                    ▼
//!      │                          DecodeCache (shared, LRU)
//!      │                                    │
//!      │                                    ▼
//!      │                            StorageBackend::decode
//!      │
//!      └─► PointResponse { VariableResult per variable }
//! ```

pub mod catalog;
pub mod config;
mod derived;
pub mod error;
pub mod meteorology;
pub mod mixer;
pub mod query;
pub mod reader;
pub mod service;
pub mod types;
pub mod weather_code;
pub mod zensun;

// Re-export commonly used types at crate root
pub use catalog::{CdsDomain, Era5HourlyVariable, Era5Variable, Era5VariableDerived};
pub use config::{CloudCoverLaw, ReaderConfig};
pub use error::{ReaderError, Result};
pub use mixer::Era5Mixer;
pub use query::{DomainPoint, PointQuery, PointResponse, VariableResult};
pub use reader::Era5Reader;
pub use service::PointDataService;
pub use types::ValueSeries;
pub use weather_code::WeatherCode;
