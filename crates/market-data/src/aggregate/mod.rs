//! Accumulation of price rows across cities and months.
//!
//! This module provides:
//! - City aggregation: every configured city for one month
//! - Month aggregation: every month of a year, stamped with year/month
//! - Pacing between requests
//! - Outcome diagnostics for reporting partial runs
//!
//! Everything runs sequentially in a fixed order, so the output ordering is
//! reproducible: months ascending, then cities in configured order, then the
//! source's commodity and recap order.

mod city;
mod diagnostics;
mod month;
mod rate_limiter;

pub use city::{CityAggregator, CityMonthResult};
pub use diagnostics::{CityAttempt, CityOutcome, MonthDiagnostics, RunDiagnostics};
pub use month::{MonthAggregator, YearResult};
pub use rate_limiter::{RateLimitConfig, RateLimiter};
