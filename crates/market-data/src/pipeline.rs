//! Wiring of configuration, source, fetcher and aggregators into one run.

use std::sync::Arc;

use log::info;

use crate::aggregate::{CityAggregator, MonthAggregator, RateLimiter, YearResult};
use crate::config::ReportConfig;
use crate::errors::MarketDataError;
use crate::fetcher::CityFetcher;
use crate::models::YearMonth;
use crate::provider::{InfoPanganSource, PriceReportSource};

/// A configured report run.
///
/// # Example
///
/// ```ignore
/// let pipeline = ReportPipeline::new(ReportConfig::default())?;
/// let result = pipeline.run().await?;
/// write_csv("cities_2024.csv", &result.records)?;
/// ```
pub struct ReportPipeline {
    config: ReportConfig,
    months: MonthAggregator,
}

impl ReportPipeline {
    /// Validate `config` and build the pipeline against the HTTP source.
    pub fn new(config: ReportConfig) -> Result<Self, MarketDataError> {
        config.validate()?;
        let source = InfoPanganSource::new(&config)?;
        Self::with_source(config, Arc::new(source))
    }

    /// Validate `config` and build the pipeline against any source.
    pub fn with_source(
        config: ReportConfig,
        source: Arc<dyn PriceReportSource>,
    ) -> Result<Self, MarketDataError> {
        config.validate()?;

        let fetcher = CityFetcher::new(source, config.cities.clone());
        let limiter = RateLimiter::from_delay(config.request_delay);
        let months = MonthAggregator::new(CityAggregator::new(fetcher, limiter));

        Ok(Self { config, months })
    }

    /// Fetch all twelve months of the configured year.
    pub async fn run(&self) -> Result<YearResult, MarketDataError> {
        info!(
            "Fetching {} for {} cities",
            self.config.target_year,
            self.config.cities.len()
        );
        self.months
            .run_year(self.config.target_year, &self.config.cities)
            .await
    }

    /// Fetch only the given months.
    pub async fn run_months(&self, months: &[YearMonth]) -> YearResult {
        self.months.run_months(months, &self.config.cities).await
    }
}
