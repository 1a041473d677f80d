//! CSV export of the final dataset.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use log::info;

use crate::errors::MarketDataError;
use crate::models::{PriceRecord, PRICE_RECORD_COLUMNS};

/// Write `records` to `path`, returning the number of data rows written.
///
/// The header row is always written, so an empty dataset yields a header-only file.
pub fn write_csv(path: impl AsRef<Path>, records: &[PriceRecord]) -> Result<usize, MarketDataError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let written = write_records(file, records)?;
    info!("Wrote {} rows to {}", written, path.display());
    Ok(written)
}

pub fn write_records<W: Write>(writer: W, records: &[PriceRecord]) -> Result<usize, MarketDataError> {
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    csv_writer.write_record(PRICE_RECORD_COLUMNS)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;

    Ok(records.len())
}

/// Read an exported file back.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<PriceRecord>, MarketDataError> {
    read_records(File::open(path)?)
}

pub fn read_records<R: Read>(reader: R) -> Result<Vec<PriceRecord>, MarketDataError> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = csv_reader.headers()?;
    if headers.iter().ne(PRICE_RECORD_COLUMNS.iter().copied()) {
        return Err(MarketDataError::Export(format!(
            "unexpected header: {}",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    csv_reader
        .deserialize()
        .map(|row| row.map_err(MarketDataError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CityIdentity, CommodityMeta, YearMonth};
    use rust_decimal_macros::dec;

    fn sample() -> PriceRecord {
        let meta = CommodityMeta {
            commodity_id: Some(100),
            commodity_name: Some("Rice, premium".to_string()),
            avg_value: Some(dec!(15000)),
            max_value: Some(dec!(16000)),
            min_value: None,
        };
        let mut record = PriceRecord::new(
            Some("2024-03-01".to_string()),
            Some(dec!(15000)),
            &meta,
            &CityIdentity::new(1, "Jakarta Barat"),
        );
        record.stamp(YearMonth::new(2024, 3).unwrap());
        record
    }

    #[test]
    fn test_header_order() {
        let mut buf = Vec::new();
        write_records(&mut buf, &[sample()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "date,daily_price,commodity_id,commodity_name,avg_value,max_value,min_value,city_id,city_name,year,month"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2024-03-01,15000,100,\"Rice, premium\",15000,16000,,1,Jakarta Barat,2024,3"
        );
    }

    #[test]
    fn test_empty_dataset_writes_header_only() {
        let mut buf = Vec::new();
        let written = write_records(&mut buf, &[]).unwrap();
        assert_eq!(written, 0);
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("date,daily_price"));
    }

    #[test]
    fn test_read_back_keeps_absent_values() {
        let mut buf = Vec::new();
        write_records(&mut buf, &[sample()]).unwrap();

        let records = read_records(buf.as_slice()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].min_value, None);
        assert_eq!(records[0].commodity_name.as_deref(), Some("Rice, premium"));
        assert_eq!(records[0].key(), (1, Some(100), Some("2024-03-01")));
    }

    #[test]
    fn test_read_back_keeps_decimal_precision_and_scale() {
        let mut record = sample();
        record.avg_value = Some(dec!(12345678901234567.89));
        record.max_value = Some(dec!(15000.50));
        record.daily_price = Some(dec!(0.0001));

        let mut buf = Vec::new();
        write_records(&mut buf, &[record.clone()]).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.contains(",12345678901234567.89,15000.50,"));

        let back = read_records(buf.as_slice()).unwrap();
        assert_eq!(back[0], record);
        assert_eq!(back[0].max_value.unwrap().to_string(), "15000.50");
        assert_eq!(back[0].daily_price.unwrap().to_string(), "0.0001");
    }

    #[test]
    fn test_read_rejects_foreign_header() {
        let err = read_records("a,b,c\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MarketDataError::Export(_)));
    }
}
