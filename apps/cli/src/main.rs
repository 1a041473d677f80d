mod config;
mod main_lib;

use config::Config;
use main_lib::{export, init_tracing, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    tracing::info!(
        "Fetching {} for {} cities from {}",
        config
            .month
            .map(|m| m.to_string())
            .unwrap_or_else(|| config.report.target_year.to_string()),
        config.report.cities.len(),
        config.report.base_url
    );

    let result = run(&config).await?;
    export(&result, &config.output_path)?;
    Ok(())
}
