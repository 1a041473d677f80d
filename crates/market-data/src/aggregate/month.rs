//! Every month of a target year.

use log::{info, warn};

use super::city::CityAggregator;
use super::diagnostics::RunDiagnostics;
use crate::errors::MarketDataError;
use crate::models::{CitySet, PriceRecord, YearMonth};

/// Final dataset of a run: every row in month order, then city order.
///
/// When nothing could be fetched `records` is empty and
/// `diagnostics.is_empty()` is true.
#[derive(Debug, Default)]
pub struct YearResult {
    pub records: Vec<PriceRecord>,
    pub diagnostics: RunDiagnostics,
}

impl YearResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Runs the city aggregator once per month and stamps each row with its month.
pub struct MonthAggregator {
    cities: CityAggregator,
}

impl MonthAggregator {
    pub fn new(cities: CityAggregator) -> Self {
        Self { cities }
    }

    /// Fetch January through December of `year`.
    pub async fn run_year(
        &self,
        year: i32,
        cities: &CitySet,
    ) -> Result<YearResult, MarketDataError> {
        let months = YearMonth::months_of(year)?;
        Ok(self.run_months(&months, cities).await)
    }

    /// Fetch the given months in the order given.
    pub async fn run_months(&self, months: &[YearMonth], cities: &CitySet) -> YearResult {
        let mut result = YearResult::default();

        for &year_month in months {
            info!("Fetching data for {}", year_month);

            let month = self.cities.run(cities, year_month).await;
            let skipped = month.is_empty();
            result.diagnostics.push(month.diagnostics);

            if skipped {
                warn!("Could not retrieve data for {}", year_month);
                continue;
            }

            result
                .records
                .extend(month.records.into_iter().map(|mut record| {
                    record.stamp(year_month);
                    record
                }));
        }

        if result.is_empty() {
            warn!(
                "No rows retrieved for any of {} months; returning an empty dataset",
                months.len()
            );
        } else {
            info!("{}", result.diagnostics.summary());
        }

        result
    }
}
