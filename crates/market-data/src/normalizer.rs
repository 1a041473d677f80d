//! Flattening of the nested commodity report into price rows.
//!
//! A report for one city and month is a list of commodities, each carrying
//! its own statistics and a `recaps` list of daily observations:
//!
//! ```text
//! [{ commodity_id, commodity_name, avg_value, max_value, min_value,
//!    recaps: [{ time, value, .. }, ..] }, ..]
//! ```
//!
//! Every recap becomes one [`PriceRecord`] holding the recap's values plus the
//! parent commodity's fields. `time` is renamed to `date` and `value` to
//! `daily_price`; any other recap fields are kept in [`PriceRecord::extra`].
//!
//! The normalizer never fails. Commodities without a `recaps` list are skipped,
//! missing or unparseable scalar fields become `None`.

use std::str::FromStr;

use log::debug;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::models::{CityIdentity, CommodityMeta, PriceRecord};

const RECAPS_KEY: &str = "recaps";
const RECAP_TIME_KEY: &str = "time";
const RECAP_VALUE_KEY: &str = "value";

/// Flatten a list of commodity objects into one row per recap, tagged with `city`.
///
/// Rows keep commodity order, then recap order.
pub fn normalize(commodities: &[Value], city: &CityIdentity) -> Vec<PriceRecord> {
    let mut records = Vec::new();

    for (index, entry) in commodities.iter().enumerate() {
        let Some(commodity) = entry.as_object() else {
            debug!("Skipping commodity #{} for {}: not an object", index, city.city_name);
            continue;
        };

        let Some(recaps) = commodity.get(RECAPS_KEY).and_then(Value::as_array) else {
            debug!(
                "Skipping commodity #{} for {}: no '{}' list",
                index, city.city_name, RECAPS_KEY
            );
            continue;
        };

        let meta = commodity_meta(commodity);
        records.extend(
            recaps
                .iter()
                .filter_map(Value::as_object)
                .map(|recap| recap_record(recap, &meta, city)),
        );
    }

    records
}

/// Extract the commodity-level fields attached to every row.
pub fn commodity_meta(commodity: &Map<String, Value>) -> CommodityMeta {
    CommodityMeta {
        commodity_id: commodity.get("commodity_id").and_then(value_as_i64),
        commodity_name: commodity.get("commodity_name").and_then(value_as_string),
        avg_value: commodity.get("avg_value").and_then(value_as_decimal),
        max_value: commodity.get("max_value").and_then(value_as_decimal),
        min_value: commodity.get("min_value").and_then(value_as_decimal),
    }
}

fn recap_record(
    recap: &Map<String, Value>,
    meta: &CommodityMeta,
    city: &CityIdentity,
) -> PriceRecord {
    let date = recap.get(RECAP_TIME_KEY).and_then(value_as_string);
    let daily_price = recap.get(RECAP_VALUE_KEY).and_then(value_as_decimal);

    let mut record = PriceRecord::new(date, daily_price, meta, city);
    record.extra = recap
        .iter()
        .filter(|(key, _)| key.as_str() != RECAP_TIME_KEY && key.as_str() != RECAP_VALUE_KEY)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    record
}

/// Numbers and numeric strings both parse; anything else is absent.
fn value_as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| {
                    f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(f)
                })
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn jakarta_barat() -> CityIdentity {
        CityIdentity::new(1, "Jakarta Barat")
    }

    #[test]
    fn test_rice_scenario() {
        let payload = json!([{
            "commodity_id": 100,
            "commodity_name": "Rice",
            "avg_value": 15000,
            "max_value": 16000,
            "min_value": 14000,
            "recaps": [
                { "time": "2024-03-01", "value": 15000 },
                { "time": "2024-03-02", "value": 15200 }
            ]
        }]);

        let records = normalize(payload.as_array().unwrap(), &jakarta_barat());

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.commodity_id == Some(100)));
        assert!(records.iter().all(|r| r.city_id == 1));
        assert!(records.iter().all(|r| r.city_name == "Jakarta Barat"));
        assert_eq!(records[0].date.as_deref(), Some("2024-03-01"));
        assert_eq!(records[1].date.as_deref(), Some("2024-03-02"));
        assert_eq!(records[0].daily_price, Some(dec!(15000)));
        assert_eq!(records[1].daily_price, Some(dec!(15200)));
        assert_eq!(records[0].avg_value, Some(dec!(15000)));
        assert_eq!(records[0].min_value, Some(dec!(14000)));
    }

    #[test]
    fn test_row_count_is_sum_of_recaps() {
        let payload = json!([
            { "commodity_id": 1, "recaps": [{ "time": "a", "value": 1 }] },
            { "commodity_id": 2, "recaps": [] },
            { "commodity_id": 3, "recaps": [
                { "time": "a", "value": 1 },
                { "time": "b", "value": 2 },
                { "time": "c", "value": 3 }
            ] }
        ]);

        let records = normalize(payload.as_array().unwrap(), &jakarta_barat());
        assert_eq!(records.len(), 4);
        let ids: Vec<_> = records.iter().map(|r| r.commodity_id).collect();
        assert_eq!(ids, vec![Some(1), Some(3), Some(3), Some(3)]);
    }

    #[test]
    fn test_empty_payload_yields_no_rows() {
        assert!(normalize(&[], &jakarta_barat()).is_empty());
    }

    #[test]
    fn test_missing_recaps_skips_commodity_only() {
        let payload = json!([
            { "commodity_id": 1, "commodity_name": "Broken" },
            { "commodity_id": 2, "recaps": "not a list" },
            "garbage",
            { "commodity_id": 3, "recaps": [{ "time": "2024-01-01", "value": 10 }] }
        ]);

        let records = normalize(payload.as_array().unwrap(), &jakarta_barat());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].commodity_id, Some(3));
    }

    #[test]
    fn test_partial_meta_carried_as_none() {
        let payload = json!([{
            "commodity_name": "Shallot",
            "max_value": "not a number",
            "recaps": [{ "time": "2024-01-01", "value": "32500.50" }]
        }]);

        let records = normalize(payload.as_array().unwrap(), &jakarta_barat());
        assert_eq!(records.len(), 1);
        let row = &records[0];
        assert_eq!(row.commodity_id, None);
        assert_eq!(row.commodity_name.as_deref(), Some("Shallot"));
        assert_eq!(row.avg_value, None);
        assert_eq!(row.max_value, None);
        assert_eq!(row.daily_price, Some(dec!(32500.50)));
    }

    #[test]
    fn test_renamed_fields_do_not_leak_into_extra() {
        let payload = json!([{
            "commodity_id": 7,
            "recaps": [{ "time": "2024-02-01", "value": 1, "unit": "kg" }]
        }]);

        let records = normalize(payload.as_array().unwrap(), &jakarta_barat());
        let extra = &records[0].extra;
        assert!(!extra.contains_key("time"));
        assert!(!extra.contains_key("value"));
        assert_eq!(extra.get("unit"), Some(&json!("kg")));
    }

    #[test]
    fn test_numeric_string_commodity_id() {
        let payload = json!([{
            "commodity_id": "42",
            "recaps": [{ "time": "2024-02-01", "value": 1.5 }]
        }]);

        let records = normalize(payload.as_array().unwrap(), &jakarta_barat());
        assert_eq!(records[0].commodity_id, Some(42));
        assert_eq!(records[0].daily_price, Some(dec!(1.5)));
    }

    #[test]
    fn test_out_of_range_commodity_id_is_absent() {
        let payload = json!([
            { "commodity_id": 1e30, "recaps": [{ "time": "a", "value": 1 }] },
            { "commodity_id": -1e30, "recaps": [{ "time": "a", "value": 1 }] },
            { "commodity_id": 42.0, "recaps": [{ "time": "a", "value": 1 }] }
        ]);

        let records = normalize(payload.as_array().unwrap(), &jakarta_barat());
        let ids: Vec<_> = records.iter().map(|r| r.commodity_id).collect();
        assert_eq!(ids, vec![None, None, Some(42)]);
    }
}
