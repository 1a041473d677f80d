//! Error types and failure classification for the price report crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all report operations
//! - [`ErrorKind`]: Coarse classification used by run diagnostics

mod kind;

pub use kind::ErrorKind;

use thiserror::Error;

/// Errors that can occur while fetching, normalizing or exporting price reports.
///
/// Fetch-level variants (transport and decode) are recovered by the city fetcher
/// and only ever surface as a skipped city. Configuration and export errors are
/// the only ones that reach the caller of a run.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The request could not be sent or the connection failed mid-flight.
    #[error("Transport error for city {city_id}: {message}")]
    Transport {
        /// City whose report was being fetched
        city_id: u32,
        /// Underlying transport message
        message: String,
    },

    /// The request exceeded the configured timeout.
    #[error("Timeout for city {city_id}")]
    Timeout {
        /// City whose report was being fetched
        city_id: u32,
    },

    /// The remote service rejected the request with HTTP 429.
    #[error("Rate limited for city {city_id}")]
    RateLimited {
        /// City whose report was being fetched
        city_id: u32,
    },

    /// Any other non-2xx HTTP status.
    #[error("HTTP error for city {city_id}: {status}")]
    HttpStatus {
        /// City whose report was being fetched
        city_id: u32,
        /// Status code returned by the server
        status: u16,
    },

    /// The body was not valid JSON or did not have the expected shape.
    #[error("Failed to decode report for city {city_id}: {message}")]
    Decode {
        /// City whose report was being fetched
        city_id: u32,
        /// Decoder message
        message: String,
    },

    /// The response decoded but has no top-level `data` key.
    #[error("Missing top-level 'data' key for city {city_id}")]
    MissingDataKey {
        /// City whose report was being fetched
        city_id: u32,
    },

    /// A year-month key could not be parsed.
    #[error("Invalid year-month: {0}")]
    InvalidYearMonth(String),

    /// The run configuration is unusable. Raised before any fetch happens.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Writing or reading the exported CSV failed.
    #[error("Export error: {0}")]
    Export(String),
}

impl MarketDataError {
    /// Returns the coarse classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use pangan_market_data::errors::{ErrorKind, MarketDataError};
    ///
    /// let error = MarketDataError::HttpStatus { city_id: 1, status: 500 };
    /// assert_eq!(error.kind(), ErrorKind::Transport);
    ///
    /// let error = MarketDataError::MissingDataKey { city_id: 1 };
    /// assert_eq!(error.kind(), ErrorKind::Decode);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. }
            | Self::Timeout { .. }
            | Self::RateLimited { .. }
            | Self::HttpStatus { .. } => ErrorKind::Transport,

            Self::Decode { .. } | Self::MissingDataKey { .. } => ErrorKind::Decode,

            Self::InvalidYearMonth(_) | Self::InvalidConfig(_) => ErrorKind::Config,

            Self::Export(_) => ErrorKind::Export,
        }
    }
}

impl From<csv::Error> for MarketDataError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<std::io::Error> for MarketDataError {
    fn from(err: std::io::Error) -> Self {
        Self::Export(err.to_string())
    }
}
