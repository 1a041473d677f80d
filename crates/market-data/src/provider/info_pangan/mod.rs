//! Jakarta "info pangan" price report source.
//!
//! # API Endpoint
//!
//! - City report: `{base_url}/report?filterBy=city&Id={city_id}&yearMonth={YYYY-MM}`
//!
//! # Response Format
//!
//! ```text
//! { "data": { "data": [ { commodity_id, commodity_name, ..., recaps: [...] }, ... ] } }
//! ```
//!
//! Only the nested `data.data` list is consumed. A response without the
//! top-level `data` key is a failure; a `null` commodity list is an empty report.

use async_trait::async_trait;
use log::debug;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER, USER_AGENT,
};
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::config::{ReportConfig, RequestHeaders};
use crate::errors::MarketDataError;
use crate::models::{CityId, YearMonth};
use crate::provider::PriceReportSource;

const SOURCE_ID: &str = "INFO_PANGAN";

/// HTTP source for the municipal price report.
///
/// # Example
///
/// ```ignore
/// let source = InfoPanganSource::new(&ReportConfig::default())?;
/// let commodities = source.fetch_report(1, "2024-03".parse()?).await?;
/// ```
pub struct InfoPanganSource {
    client: Client,
    base_url: String,
}

impl InfoPanganSource {
    /// Build the HTTP client from the configured timeout and headers.
    pub fn new(config: &ReportConfig) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(default_headers(&config.headers)?)
            .build()
            .map_err(|e| MarketDataError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn report_url(&self, city_id: CityId, year_month: YearMonth) -> String {
        format!(
            "{}/report?filterBy=city&Id={}&yearMonth={}",
            self.base_url, city_id, year_month
        )
    }

    /// Send the request and return the body of a 2xx response.
    async fn fetch(&self, city_id: CityId, url: &str) -> Result<String, MarketDataError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout { city_id }
            } else {
                MarketDataError::Transport {
                    city_id,
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited { city_id });
        }

        if !status.is_success() {
            return Err(MarketDataError::HttpStatus {
                city_id,
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout { city_id }
            } else {
                MarketDataError::Transport {
                    city_id,
                    message: e.to_string(),
                }
            }
        })
    }
}

#[async_trait]
impl PriceReportSource for InfoPanganSource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    async fn fetch_report(
        &self,
        city_id: CityId,
        year_month: YearMonth,
    ) -> Result<Vec<Value>, MarketDataError> {
        let url = self.report_url(city_id, year_month);
        debug!("Fetch data from {}", url);

        let body = self.fetch(city_id, &url).await?;
        parse_report(city_id, &body)
    }
}

/// Extract the commodity list from a report body.
pub fn parse_report(city_id: CityId, body: &str) -> Result<Vec<Value>, MarketDataError> {
    let json: Value = serde_json::from_str(body).map_err(|e| MarketDataError::Decode {
        city_id,
        message: e.to_string(),
    })?;

    let data = json
        .get("data")
        .ok_or(MarketDataError::MissingDataKey { city_id })?;

    match data.get("data") {
        Some(Value::Array(commodities)) => Ok(commodities.clone()),
        Some(Value::Null) => Ok(Vec::new()),
        Some(other) => Err(MarketDataError::Decode {
            city_id,
            message: format!(
                "expected commodity list under 'data.data', got {}",
                type_name(other)
            ),
        }),
        None => Err(MarketDataError::Decode {
            city_id,
            message: "missing 'data.data' commodity list".to_string(),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn default_headers(headers: &RequestHeaders) -> Result<HeaderMap, MarketDataError> {
    let mut map = HeaderMap::new();
    for (name, value) in [
        (USER_AGENT, &headers.user_agent),
        (ACCEPT, &headers.accept),
        (ACCEPT_LANGUAGE, &headers.accept_language),
        (REFERER, &headers.referer),
        (ORIGIN, &headers.origin),
    ] {
        let header_value = HeaderValue::from_str(value).map_err(|_| {
            MarketDataError::InvalidConfig(format!("invalid value for header {}", name.as_str()))
        })?;
        map.insert(name, header_value);
    }
    Ok(map)
}
