//! All configured cities for one month.

use log::{info, warn};

use super::diagnostics::MonthDiagnostics;
use super::rate_limiter::RateLimiter;
use crate::fetcher::{CityFetch, CityFetcher};
use crate::models::{CitySet, PriceRecord, YearMonth};

/// Combined rows of every city for one month, plus what happened per city.
#[derive(Debug)]
pub struct CityMonthResult {
    pub records: Vec<PriceRecord>,
    pub diagnostics: MonthDiagnostics,
}

impl CityMonthResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Fetches every city of a set for one month, one after the other.
///
/// A failing or empty city is recorded and skipped; it never stops the others.
pub struct CityAggregator {
    fetcher: CityFetcher,
    limiter: RateLimiter,
}

impl CityAggregator {
    pub fn new(fetcher: CityFetcher, limiter: RateLimiter) -> Self {
        Self { fetcher, limiter }
    }

    pub async fn run(&self, cities: &CitySet, year_month: YearMonth) -> CityMonthResult {
        let mut diagnostics = MonthDiagnostics::new(year_month);
        let mut batches: Vec<Vec<PriceRecord>> = Vec::new();

        for city in cities {
            self.limiter.acquire().await;
            info!("[{}] Fetch data for {}", city.city_id, city.city_name);

            match self.fetcher.fetch_city(city, year_month).await {
                CityFetch::Records(records) => {
                    info!(
                        "Fetched {} rows for {} in {}",
                        records.len(),
                        city.city_name,
                        year_month
                    );
                    diagnostics.record_rows(city, records.len());
                    batches.push(records);
                }
                CityFetch::Empty => {
                    info!("Data was empty for {} in {}", city.city_name, year_month);
                    diagnostics.record_empty(city);
                }
                CityFetch::Unavailable(e) => {
                    warn!(
                        "Could not retrieve data for {} in {}",
                        city.city_name, year_month
                    );
                    diagnostics.record_failure(city, &e);
                }
            }
        }

        let records: Vec<PriceRecord> = batches.into_iter().flatten().collect();
        if records.is_empty() {
            warn!("No data was retrieved from any city for {}", year_month);
        } else {
            info!("{}", diagnostics.summary());
        }

        CityMonthResult {
            records,
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MarketDataError;
    use crate::models::CityId;
    use crate::provider::PriceReportSource;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    /// Answers every city with one commodity and remembers when it was asked.
    struct TimedSource {
        calls: Mutex<Vec<(CityId, Instant)>>,
    }

    impl TimedSource {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(CityId, Instant)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PriceReportSource for TimedSource {
        fn id(&self) -> &'static str {
            "TIMED"
        }

        async fn fetch_report(
            &self,
            city_id: CityId,
            _year_month: YearMonth,
        ) -> Result<Vec<Value>, MarketDataError> {
            self.calls.lock().unwrap().push((city_id, Instant::now()));
            if city_id == 2 {
                return Err(MarketDataError::HttpStatus {
                    city_id,
                    status: 500,
                });
            }
            Ok(vec![json!({
                "commodity_id": 100,
                "recaps": [{ "time": "2024-03-01", "value": 15000 }]
            })])
        }
    }

    fn three_cities() -> CitySet {
        CitySet::from_pairs([(1, "Jakarta Barat"), (2, "Jakarta Pusat"), (3, "Jakarta Selatan")])
    }

    fn aggregator(source: Arc<TimedSource>, delay: Duration) -> CityAggregator {
        CityAggregator::new(
            CityFetcher::new(source, CitySet::jakarta()),
            RateLimiter::from_delay(delay),
        )
    }

    #[tokio::test]
    async fn test_cities_are_paced_by_request_delay() {
        let delay = Duration::from_millis(40);
        let source = Arc::new(TimedSource::new());
        let start = Instant::now();
        let aggregator = aggregator(source.clone(), delay);

        let result = aggregator
            .run(&three_cities(), YearMonth::new(2024, 3).unwrap())
            .await;

        let calls = source.calls();
        assert_eq!(calls.len(), 3);
        let (_, last_call) = calls[2];
        assert!(last_call.duration_since(start) >= delay * 2);
        assert_eq!(result.records.len(), 2);
    }

    #[tokio::test]
    async fn test_zero_delay_does_not_pace() {
        let source = Arc::new(TimedSource::new());
        let start = Instant::now();
        let aggregator = aggregator(source.clone(), Duration::ZERO);

        aggregator
            .run(&three_cities(), YearMonth::new(2024, 3).unwrap())
            .await;

        assert_eq!(source.calls().len(), 3);
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_failed_city_is_recorded_and_others_kept_in_order() {
        let source = Arc::new(TimedSource::new());
        let aggregator = aggregator(source.clone(), Duration::ZERO);

        let result = aggregator
            .run(&three_cities(), YearMonth::new(2024, 3).unwrap())
            .await;

        assert!(!result.is_empty());
        let ids: Vec<_> = result.records.iter().map(|r| r.city_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(result.diagnostics.succeeded(), 2);
        assert_eq!(result.diagnostics.failed(), 1);
        let called: Vec<_> = source.calls().into_iter().map(|(id, _)| id).collect();
        assert_eq!(called, vec![1, 2, 3]);
    }
}
