//! Price report source trait definition.
//!
//! This module defines the `PriceReportSource` trait that the fetcher uses to
//! obtain one city/month report.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::{CityId, YearMonth};

/// Trait for price report sources.
///
/// A source performs exactly one request per call and never retries on its
/// own. It returns the raw commodity list (the `data.data` array of the API
/// response); flattening happens in the normalizer.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use pangan_market_data::provider::PriceReportSource;
///
/// struct FixtureSource;
///
/// #[async_trait]
/// impl PriceReportSource for FixtureSource {
///     fn id(&self) -> &'static str {
///         "FIXTURE"
///     }
///
///     async fn fetch_report(
///         &self,
///         _city_id: CityId,
///         _year_month: YearMonth,
///     ) -> Result<Vec<Value>, MarketDataError> {
///         Ok(Vec::new())
///     }
/// }
/// ```
#[async_trait]
pub trait PriceReportSource: Send + Sync {
    /// Identifier used in log lines.
    fn id(&self) -> &'static str;

    /// Fetch the commodity list for one city and month.
    ///
    /// # Returns
    ///
    /// The commodity objects on success (possibly empty), or a transport/decode
    /// `MarketDataError` that the caller treats as "no data" for this city.
    async fn fetch_report(
        &self,
        city_id: CityId,
        year_month: YearMonth,
    ) -> Result<Vec<Value>, MarketDataError>;
}
