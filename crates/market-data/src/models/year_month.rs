use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::errors::MarketDataError;

/// Year-month key identifying one month of a report query, shown as `YYYY-MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Build a key, rejecting months outside 1..=12 and years chrono cannot represent.
    pub fn new(year: i32, month: u32) -> Result<Self, MarketDataError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self { year, month })
            .ok_or_else(|| MarketDataError::InvalidYearMonth(format!("{}-{}", year, month)))
    }

    /// The twelve keys of a calendar year, January first.
    pub fn months_of(year: i32) -> Result<Vec<Self>, MarketDataError> {
        (1..=12).map(|month| Self::new(year, month)).collect()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let date = NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d")
            .map_err(|_| MarketDataError::InvalidYearMonth(trimmed.to_string()))?;
        // chrono accepts single-digit months; keys on the wire are always zero-padded
        if trimmed.len() != 7 {
            return Err(MarketDataError::InvalidYearMonth(trimmed.to_string()));
        }
        Ok(Self {
            year: date.year(),
            month: date.month(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_zero_pads_month() {
        let key = YearMonth::new(2024, 3).unwrap();
        assert_eq!(key.to_string(), "2024-03");
    }

    #[test]
    fn test_parse_valid_key() {
        let key: YearMonth = "2025-11".parse().unwrap();
        assert_eq!(key.year(), 2025);
        assert_eq!(key.month(), 11);
    }

    #[test]
    fn test_parse_rejects_bad_keys() {
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("2024-3".parse::<YearMonth>().is_err());
        assert!("March 2024".parse::<YearMonth>().is_err());
        assert!(YearMonth::new(2024, 0).is_err());
    }

    #[test]
    fn test_months_of_year_in_order() {
        let months = YearMonth::months_of(2024).unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].to_string(), "2024-01");
        assert_eq!(months[11].to_string(), "2024-12");
        assert!(months.windows(2).all(|w| w[0] < w[1]));
    }
}
