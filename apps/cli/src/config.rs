use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context};
use pangan_market_data::config::{
    DEFAULT_BASE_URL, DEFAULT_REQUEST_DELAY, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TARGET_YEAR,
};
use pangan_market_data::{CityId, CitySet, ReportConfig, YearMonth};

/// Shape of the log lines written to stderr.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

pub struct Config {
    pub report: ReportConfig,
    /// Single month to fetch instead of the whole year
    pub month: Option<YearMonth>,
    pub output_path: PathBuf,
    pub log_format: LogFormat,
}

impl Config {
    /// Load from the process environment (and `.env`), with the target year
    /// optionally given as the first argument.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let year_arg = std::env::args().nth(1);
        Self::from_lookup(|key| std::env::var(key).ok(), year_arg)
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        year_arg: Option<String>,
    ) -> anyhow::Result<Self> {
        let target_year: i32 = match year_arg.or_else(|| lookup("PANGAN_YEAR")) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid target year '{}'", raw))?,
            None => DEFAULT_TARGET_YEAR,
        };

        let month = lookup("PANGAN_MONTH")
            .map(|raw| -> anyhow::Result<YearMonth> {
                let month: u32 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid PANGAN_MONTH '{}'", raw))?;
                Ok(YearMonth::new(target_year, month)?)
            })
            .transpose()?;

        let cities = match lookup("PANGAN_CITIES") {
            Some(raw) => CitySet::jakarta().select(&parse_city_ids(&raw)?),
            None => CitySet::jakarta(),
        };

        let base_url = lookup("PANGAN_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let request_delay = duration_ms(&lookup, "PANGAN_REQUEST_DELAY_MS", DEFAULT_REQUEST_DELAY)?;
        let request_timeout =
            duration_ms(&lookup, "PANGAN_REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT)?;

        let output_path = lookup("PANGAN_OUTPUT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(format!("cities_{}.csv", target_year)));

        let log_format = match lookup("PANGAN_LOG_FORMAT") {
            Some(raw) => parse_log_format(&raw)?,
            None => LogFormat::default(),
        };

        let report = ReportConfig {
            target_year,
            cities,
            base_url,
            request_delay,
            request_timeout,
            ..Default::default()
        };
        report.validate()?;

        Ok(Self {
            report,
            month,
            output_path,
            log_format,
        })
    }
}

fn parse_log_format(raw: &str) -> anyhow::Result<LogFormat> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(anyhow!(
            "Invalid PANGAN_LOG_FORMAT '{}', expected 'text' or 'json'",
            other
        )),
    }
}

fn parse_city_ids(raw: &str) -> anyhow::Result<Vec<CityId>> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<CityId>()
                .with_context(|| format!("Invalid city id '{}' in PANGAN_CITIES", s))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    if ids.is_empty() {
        return Err(anyhow!("PANGAN_CITIES is set but lists no city ids"));
    }
    Ok(ids)
}

fn duration_ms(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> anyhow::Result<Duration> {
    match lookup(key) {
        Some(raw) => {
            let ms: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} '{}'", key, raw))?;
            Ok(Duration::from_millis(ms))
        }
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)], year_arg: Option<&str>) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned(), year_arg.map(str::to_string))
    }

    #[test]
    fn defaults_cover_every_city_for_default_year() {
        let config = load(&[], None).unwrap();
        assert_eq!(config.report.target_year, DEFAULT_TARGET_YEAR);
        assert_eq!(config.report.cities.len(), 8);
        assert_eq!(config.report.request_delay, Duration::from_secs(1));
        assert!(config.month.is_none());
        assert_eq!(config.output_path, PathBuf::from("cities_2024.csv"));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn reads_log_format() {
        let config = load(&[("PANGAN_LOG_FORMAT", "JSON")], None).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);

        let config = load(&[("PANGAN_LOG_FORMAT", "text")], None).unwrap();
        assert_eq!(config.log_format, LogFormat::Text);

        assert!(load(&[("PANGAN_LOG_FORMAT", "xml")], None).is_err());
    }

    #[test]
    fn year_argument_wins_over_env() {
        let config = load(&[("PANGAN_YEAR", "2023")], Some("2025")).unwrap();
        assert_eq!(config.report.target_year, 2025);
        assert_eq!(config.output_path, PathBuf::from("cities_2025.csv"));
    }

    #[test]
    fn reads_cities_month_and_timings() {
        let config = load(
            &[
                ("PANGAN_YEAR", "2025"),
                ("PANGAN_MONTH", "11"),
                ("PANGAN_CITIES", "1, 99"),
                ("PANGAN_REQUEST_DELAY_MS", "0"),
                ("PANGAN_REQUEST_TIMEOUT_MS", "2500"),
                ("PANGAN_OUTPUT", "/tmp/out.csv"),
            ],
            None,
        )
        .unwrap();

        assert_eq!(config.month.unwrap().to_string(), "2025-11");
        let names: Vec<String> = config
            .report
            .cities
            .iter()
            .map(|c| c.city_name.to_string())
            .collect();
        assert_eq!(names, vec!["Jakarta Barat", "ID 99 (Unknown)"]);
        assert_eq!(config.report.request_delay, Duration::ZERO);
        assert_eq!(config.report.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.output_path, PathBuf::from("/tmp/out.csv"));
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(load(&[("PANGAN_YEAR", "twenty")], None).is_err());
        assert!(load(&[("PANGAN_YEAR", "12")], None).is_err());
        assert!(load(&[("PANGAN_MONTH", "13")], None).is_err());
        assert!(load(&[("PANGAN_CITIES", "1,x")], None).is_err());
        assert!(load(&[("PANGAN_CITIES", " , ")], None).is_err());
        assert!(load(&[("PANGAN_REQUEST_TIMEOUT_MS", "0")], None).is_err());
        assert!(load(&[("PANGAN_BASE_URL", "localhost")], None).is_err());
    }
}
