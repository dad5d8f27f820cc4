//! Core data types.
//!
//! - [`series`]: `AssetSeries` and `PricePoint`, validated historical prices
//! - [`time`]: business-day counting used by scenario coverage checks

pub mod series;
pub mod time;

pub use series::{AssetSeries, PricePoint};
pub use time::{is_business_day, business_days_between, business_days_in};
