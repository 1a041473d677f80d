//! Per-city and per-run outcome tracking.

use crate::errors::{ErrorKind, MarketDataError};
use crate::models::{CityId, CityIdentity, YearMonth};

/// What happened when a city was fetched for one month.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CityOutcome {
    /// Report normalized into this many rows.
    Rows(usize),

    /// Well-formed report without commodities.
    Empty,

    /// Transport or decode failure; the city contributed nothing.
    Failed { kind: ErrorKind, message: String },
}

/// Record of a single city fetch.
#[derive(Clone, Debug)]
pub struct CityAttempt {
    pub city_id: CityId,
    pub city_name: String,
    pub outcome: CityOutcome,
}

/// Outcomes of every city fetched for one month.
#[derive(Clone, Debug)]
pub struct MonthDiagnostics {
    pub year_month: YearMonth,
    pub attempts: Vec<CityAttempt>,
}

impl MonthDiagnostics {
    pub fn new(year_month: YearMonth) -> Self {
        Self {
            year_month,
            attempts: Vec::new(),
        }
    }

    pub fn record_rows(&mut self, city: &CityIdentity, rows: usize) {
        self.push(city, CityOutcome::Rows(rows));
    }

    pub fn record_empty(&mut self, city: &CityIdentity) {
        self.push(city, CityOutcome::Empty);
    }

    pub fn record_failure(&mut self, city: &CityIdentity, error: &MarketDataError) {
        self.push(
            city,
            CityOutcome::Failed {
                kind: error.kind(),
                message: error.to_string(),
            },
        );
    }

    fn push(&mut self, city: &CityIdentity, outcome: CityOutcome) {
        self.attempts.push(CityAttempt {
            city_id: city.city_id,
            city_name: city.city_name.to_string(),
            outcome,
        });
    }

    /// Total rows contributed by successful cities.
    pub fn rows(&self) -> usize {
        self.attempts
            .iter()
            .map(|a| match a.outcome {
                CityOutcome::Rows(n) => n,
                _ => 0,
            })
            .sum()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, CityOutcome::Rows(_)))
    }

    pub fn empty(&self) -> usize {
        self.count(|o| matches!(o, CityOutcome::Empty))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, CityOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&CityOutcome) -> bool) -> usize {
        self.attempts.iter().filter(|a| predicate(&a.outcome)).count()
    }

    pub fn has_rows(&self) -> bool {
        self.rows() > 0
    }

    /// Summary for logging/debugging.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} rows from {} cities ({} empty, {} failed)",
            self.year_month,
            self.rows(),
            self.succeeded(),
            self.empty(),
            self.failed()
        )
    }
}

/// Outcomes of a whole run, one entry per month attempted.
#[derive(Clone, Debug, Default)]
pub struct RunDiagnostics {
    pub months: Vec<MonthDiagnostics>,
}

impl RunDiagnostics {
    pub fn new() -> Self {
        Self { months: Vec::new() }
    }

    pub fn push(&mut self, month: MonthDiagnostics) {
        self.months.push(month);
    }

    pub fn total_rows(&self) -> usize {
        self.months.iter().map(MonthDiagnostics::rows).sum()
    }

    /// Months that contributed at least one row.
    pub fn months_with_rows(&self) -> Vec<YearMonth> {
        self.months
            .iter()
            .filter(|m| m.has_rows())
            .map(|m| m.year_month)
            .collect()
    }

    /// Months skipped because no city returned rows.
    pub fn skipped_months(&self) -> Vec<YearMonth> {
        self.months
            .iter()
            .filter(|m| !m.has_rows())
            .map(|m| m.year_month)
            .collect()
    }

    /// Every failed city fetch with the month it belonged to.
    pub fn failed_cities(&self) -> Vec<(YearMonth, &CityAttempt)> {
        self.months
            .iter()
            .flat_map(|m| {
                m.attempts
                    .iter()
                    .filter(|a| matches!(a.outcome, CityOutcome::Failed { .. }))
                    .map(move |a| (m.year_month, a))
            })
            .collect()
    }

    /// True when the run produced no rows at all.
    pub fn is_empty(&self) -> bool {
        self.total_rows() == 0
    }

    /// True when every city of every month returned rows.
    pub fn is_complete(&self) -> bool {
        !self.months.is_empty()
            && self
                .months
                .iter()
                .all(|m| m.succeeded() == m.attempts.len() && !m.attempts.is_empty())
    }

    /// Summary for logging/debugging.
    pub fn summary(&self) -> String {
        let status = if self.is_empty() {
            "EMPTY"
        } else if self.is_complete() {
            "COMPLETE"
        } else {
            "PARTIAL"
        };
        format!(
            "{}: {} rows, {}/{} months with data, {} failed city fetches",
            status,
            self.total_rows(),
            self.months_with_rows().len(),
            self.months.len(),
            self.failed_cities().len()
        )
    }
}
