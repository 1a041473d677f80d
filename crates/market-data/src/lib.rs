//! Pangan Market Data Crate
//!
//! This crate fetches daily food-commodity price reports from the Jakarta
//! open-data API and flattens them into one exportable table.
//!
//! # Overview
//!
//! The crate supports:
//! - Any set of cities, with placeholder names for unknown ids
//! - Whole-year or selected-month runs
//! - Partial-failure tolerance: a failing city/month is reported and skipped
//! - Pacing between requests
//! - CSV export with a fixed column order
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! | MonthAggregator  |  (12 months, stamps year/month)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! | CityAggregator   |  (every city, one month, paced)
//! +------------------+
//!          |
//!          v
//! +------------------+     +-------------------+
//! |   CityFetcher    | --> | PriceReportSource |  (HTTP or fake)
//! +------------------+     +-------------------+
//!          |
//!          v
//! +------------------+
//! |   normalizer     |  (commodity -> recap rows)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`CityIdentity`] / [`CitySet`] - Cities to fetch
//! - [`YearMonth`] - `YYYY-MM` query key
//! - [`PriceRecord`] - One flattened row
//! - [`YearResult`] - Final dataset with [`RunDiagnostics`]
//! - [`ReportConfig`] - Run configuration
//! - [`ReportPipeline`] - Configured run

pub mod aggregate;
pub mod config;
pub mod errors;
pub mod export;
pub mod fetcher;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod provider;

// Re-export all public types from models
pub use models::{
    CityId, CityIdentity, CityName, CitySet, CommodityMeta, PriceRecord, YearMonth,
    PRICE_RECORD_COLUMNS,
};

// Re-export aggregation types
pub use aggregate::{
    CityAggregator, CityAttempt, CityMonthResult, CityOutcome, MonthAggregator,
    MonthDiagnostics, RateLimitConfig, RateLimiter, RunDiagnostics, YearResult,
};

// Re-export provider types
pub use provider::{InfoPanganSource, PriceReportSource};

pub use config::{ReportConfig, RequestHeaders};
pub use errors::{ErrorKind, MarketDataError};
pub use export::{read_csv, write_csv};
pub use fetcher::{CityFetch, CityFetcher};
pub use normalizer::normalize;
pub use pipeline::ReportPipeline;
