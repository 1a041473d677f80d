//! Price report models
//!
//! This module contains the core data types of the report pipeline:
//! - `types` - Type aliases for common identifiers (CityId, CityName)
//! - `city` - City identity and the ordered set of cities to fetch
//! - `year_month` - `YYYY-MM` query key
//! - `record` - The flattened price row and per-commodity metadata

mod city;
mod record;
mod types;
mod year_month;

pub use city::{CityIdentity, CitySet};
pub use record::{CommodityMeta, PriceRecord, PRICE_RECORD_COLUMNS};
pub use types::{CityId, CityName};
pub use year_month::YearMonth;
