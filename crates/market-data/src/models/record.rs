use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::city::CityIdentity;
use super::types::CityId;
use super::year_month::YearMonth;

/// Export column order. Downstream consumers rely on this exact sequence.
pub const PRICE_RECORD_COLUMNS: [&str; 11] = [
    "date",
    "daily_price",
    "commodity_id",
    "commodity_name",
    "avg_value",
    "max_value",
    "min_value",
    "city_id",
    "city_name",
    "year",
    "month",
];

/// Descriptive aggregates the source computes per commodity.
///
/// Every field is optional: a commodity missing some of them still yields rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommodityMeta {
    pub commodity_id: Option<i64>,
    pub commodity_name: Option<String>,
    pub avg_value: Option<Decimal>,
    pub max_value: Option<Decimal>,
    pub min_value: Option<Decimal>,
}

/// One flattened row: a daily recap merged with its commodity and city.
///
/// Field order matches [`PRICE_RECORD_COLUMNS`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Recap timestamp (source field `time`)
    pub date: Option<String>,

    /// Daily price (source field `value`)
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub daily_price: Option<Decimal>,

    pub commodity_id: Option<i64>,
    pub commodity_name: Option<String>,

    // Prices travel as strings so CSV read-back keeps the exact scale.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub avg_value: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub max_value: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub min_value: Option<Decimal>,

    pub city_id: CityId,
    pub city_name: String,

    /// Set once the row is placed into a month result
    pub year: Option<i32>,
    pub month: Option<u32>,

    /// Recap fields other than `time`/`value`, carried through untouched.
    /// Not part of the export column set.
    #[serde(skip)]
    pub extra: Map<String, Value>,
}

impl PriceRecord {
    pub fn new(
        date: Option<String>,
        daily_price: Option<Decimal>,
        meta: &CommodityMeta,
        city: &CityIdentity,
    ) -> Self {
        Self {
            date,
            daily_price,
            commodity_id: meta.commodity_id,
            commodity_name: meta.commodity_name.clone(),
            avg_value: meta.avg_value,
            max_value: meta.max_value,
            min_value: meta.min_value,
            city_id: city.city_id,
            city_name: city.city_name.to_string(),
            year: None,
            month: None,
            extra: Map::new(),
        }
    }

    /// Tag the row with the month it was fetched for.
    pub fn stamp(&mut self, year_month: YearMonth) {
        self.year = Some(year_month.year());
        self.month = Some(year_month.month());
    }

    /// `(city_id, commodity_id, date)` - unique per row for well-behaved sources.
    pub fn key(&self) -> (CityId, Option<i64>, Option<&str>) {
        (self.city_id, self.commodity_id, self.date.as_deref())
    }
}
