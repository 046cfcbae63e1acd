//! Common types shared across the point read-path crates.

pub mod error;
pub mod grid;
pub mod time;
pub mod units;

pub use error::{CommonError, CommonResult};
pub use grid::{grids, GridPoint, GridSpec};
pub use time::{parse_iso8601, TimeRange};
pub use units::SiUnit;
