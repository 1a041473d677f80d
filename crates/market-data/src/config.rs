//! Run configuration passed into the pipeline at construction.

use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::CitySet;

/// Public endpoint root of the Jakarta price report API.
pub const DEFAULT_BASE_URL: &str = "https://infopangan.jakarta.go.id/api2/v1/public";

/// Year fetched when none is configured.
pub const DEFAULT_TARGET_YEAR: i32 = 2024;

/// Pause between city requests.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);

/// HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

const MIN_TARGET_YEAR: i32 = 1900;
const MAX_TARGET_YEAR: i32 = 9999;

/// Browser-like headers sent with every report request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestHeaders {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub referer: String,
    pub origin: String,
}

impl Default for RequestHeaders {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
                .to_string(),
            accept: "application/json, text/plain, */*".to_string(),
            accept_language: "id-ID,id;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
            referer: "https://infopangan.jakarta.go.id/".to_string(),
            origin: "https://infopangan.jakarta.go.id".to_string(),
        }
    }
}

/// Everything a run needs: which year, which cities, where and how to fetch.
#[derive(Clone, Debug)]
pub struct ReportConfig {
    pub target_year: i32,
    pub cities: CitySet,
    pub base_url: String,
    /// Pause applied between city fetches. Zero disables pacing.
    pub request_delay: Duration,
    pub request_timeout: Duration,
    pub headers: RequestHeaders,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            target_year: DEFAULT_TARGET_YEAR,
            cities: CitySet::jakarta(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_delay: DEFAULT_REQUEST_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            headers: RequestHeaders::default(),
        }
    }
}

impl ReportConfig {
    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<(), MarketDataError> {
        if !(MIN_TARGET_YEAR..=MAX_TARGET_YEAR).contains(&self.target_year) {
            return Err(MarketDataError::InvalidConfig(format!(
                "target year {} outside {}..={}",
                self.target_year, MIN_TARGET_YEAR, MAX_TARGET_YEAR
            )));
        }

        if self.cities.is_empty() {
            return Err(MarketDataError::InvalidConfig(
                "city set is empty".to_string(),
            ));
        }

        let base_url = self.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(MarketDataError::InvalidConfig(format!(
                "base url must be http(s), got '{}'",
                self.base_url
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(MarketDataError::InvalidConfig(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
