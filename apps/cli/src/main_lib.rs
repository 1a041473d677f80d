use std::path::Path;

use pangan_market_data::{write_csv, ReportPipeline, YearResult};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, LogFormat};

/// Install the global subscriber. `RUST_LOG` filters, defaulting to `info`;
/// library `log` records are picked up through the subscriber's log bridge.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().flatten_event(true).with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
            .init(),
    }
}

/// Run the configured fetch. Only configuration problems fail here.
pub async fn run(config: &Config) -> anyhow::Result<YearResult> {
    let pipeline = ReportPipeline::new(config.report.clone())?;

    let result = match config.month {
        Some(month) => pipeline.run_months(&[month]).await,
        None => pipeline.run().await?,
    };

    let diagnostics = &result.diagnostics;
    if diagnostics.is_empty() {
        tracing::warn!("Run finished without any data: {}", diagnostics.summary());
    } else {
        tracing::info!("Run finished: {}", diagnostics.summary());
    }
    for (year_month, attempt) in diagnostics.failed_cities() {
        tracing::warn!(
            "Missing {} ({}) for {}: {:?}",
            attempt.city_name,
            attempt.city_id,
            year_month,
            attempt.outcome
        );
    }

    Ok(result)
}

pub fn export(result: &YearResult, path: &Path) -> anyhow::Result<()> {
    let written = write_csv(path, &result.records)?;
    tracing::info!("Exported {} rows to {}", written, path.display());
    Ok(())
}
