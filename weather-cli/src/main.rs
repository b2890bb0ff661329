//! Binary crate for the `weather-monitor` console.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The interactive menu and configuration prompts
//! - Human-friendly output formatting

use clap::Parser;
use tracing_subscriber::EnvFilter;
use weather_core::Config;

mod cli;
mod menu;

/// Used when neither `RUST_LOG` nor the config file sets a filter. Alerts and
/// notices are printed by the menu itself, so only failures are logged.
const DEFAULT_LOG_FILTER: &str = "error";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    let config = Config::load()?;

    init_tracing(&config);

    cmd.run(config).await
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}
