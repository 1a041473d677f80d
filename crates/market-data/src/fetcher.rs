//! One bounded unit of work: a single city for a single month.

use std::sync::Arc;

use log::warn;

use crate::errors::MarketDataError;
use crate::models::{CityId, CityIdentity, CitySet, PriceRecord, YearMonth};
use crate::normalizer::normalize;
use crate::provider::PriceReportSource;

/// Result of fetching one city for one month.
///
/// `Unavailable` is the "no data" signal and is distinct from `Empty`, which
/// means the service answered correctly but had nothing to report.
#[derive(Debug)]
pub enum CityFetch {
    Records(Vec<PriceRecord>),
    Empty,
    Unavailable(MarketDataError),
}

/// Fetches and normalizes the report of one city.
///
/// Failures are captured in the returned [`CityFetch`]; nothing escapes as an
/// error. Exactly one source request is made per call.
pub struct CityFetcher {
    source: Arc<dyn PriceReportSource>,
    known_cities: CitySet,
}

impl CityFetcher {
    pub fn new(source: Arc<dyn PriceReportSource>, known_cities: CitySet) -> Self {
        Self {
            source,
            known_cities,
        }
    }

    /// Resolve `city_id` against the known set and fetch it.
    ///
    /// Unknown ids get a placeholder name and are fetched normally.
    pub async fn fetch(&self, city_id: CityId, year_month: YearMonth) -> CityFetch {
        let city = self.known_cities.resolve(city_id);
        self.fetch_city(&city, year_month).await
    }

    pub async fn fetch_city(&self, city: &CityIdentity, year_month: YearMonth) -> CityFetch {
        let commodities = match self.source.fetch_report(city.city_id, year_month).await {
            Ok(commodities) => commodities,
            Err(e) => {
                warn!(
                    "{}: failed to fetch {} ({}) for {}: {}",
                    self.source.id(),
                    city.city_name,
                    city.city_id,
                    year_month,
                    e
                );
                return CityFetch::Unavailable(e);
            }
        };

        if commodities.is_empty() {
            warn!("No commodity data for {} in {}", city.city_name, year_month);
            return CityFetch::Empty;
        }

        let records = normalize(&commodities, city);
        if records.is_empty() {
            warn!(
                "{} commodities for {} in {} carried no recaps",
                commodities.len(),
                city.city_name,
                year_month
            );
            return CityFetch::Empty;
        }

        CityFetch::Records(records)
    }
}
