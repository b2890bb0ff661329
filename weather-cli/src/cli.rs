use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use std::{path::PathBuf, sync::Arc};
use tracing::info;
use weather_core::{
    Config, Recorder, SourceKind, StorageConfig, TemperatureScale, WeatherStation, convert,
    store_from_config,
};

use crate::menu::{Session, scale_or_default};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-monitor", version, about = "Weather monitoring and alert console")]
pub struct Cli {
    /// Defaults to `run` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the interactive monitoring menu.
    Run,

    /// Choose default scale, data source and storage.
    Configure,

    /// Convert a temperature between scales.
    Convert {
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Scale of `value`: Celsius, Fahrenheit or Kelvin.
        #[arg(long, default_value = "Celsius")]
        from: String,

        /// Target scale: Celsius, Fahrenheit or Kelvin.
        #[arg(long)]
        to: String,
    },
}

impl Cli {
    pub async fn run(self, config: Config) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Run) {
            Command::Run => run_menu(config).await,
            Command::Configure => configure(config),
            Command::Convert { value, from, to } => {
                let from = scale_or_default(&from);
                let to = scale_or_default(&to);
                println!(
                    "{value}{} = {}{}",
                    from.symbol(),
                    convert(value, from, to),
                    to.symbol()
                );
                Ok(())
            }
        }
    }
}

async fn run_menu(config: Config) -> anyhow::Result<()> {
    let source = config.source_kind()?;
    let store = store_from_config(&config)?;

    let (station, worker) = match store {
        Some(store) => {
            info!(?store, "persisting readings");
            let (recorder, worker) = Recorder::spawn(store);
            (WeatherStation::with_recorder(recorder), Some(worker))
        }
        None => (WeatherStation::new(), None),
    };

    let session = Session::new(Arc::new(station), config.scale(), source);

    // Prompts block, so keep them off the runtime threads the recorder uses.
    tokio::task::spawn_blocking(move || session.run())
        .await
        .context("Menu task panicked")??;

    // Session (and with it the station and recorder) is gone; let the
    // worker finish anything still queued.
    if let Some(worker) = worker {
        worker.await.context("Recorder task panicked")?;
    }

    Ok(())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let scale = Select::new("Default temperature scale:", TemperatureScale::all().to_vec())
        .with_starting_cursor(index_of(TemperatureScale::all(), &config.scale()))
        .prompt()?;
    config.set_scale(scale);

    let current_source = config.source_kind().unwrap_or_default();
    let source = Select::new("Default data source:", SourceKind::all().to_vec())
        .with_starting_cursor(index_of(SourceKind::all(), &current_source))
        .prompt()?;
    config.set_source(source);

    let storage = Select::new("Store readings in:", vec!["jsonl", "http", "none"]).prompt()?;
    config.storage = match storage {
        "jsonl" => {
            let path = Text::new("Readings file (leave empty for the default location):")
                .prompt()?;
            let path = path.trim();
            StorageConfig::Jsonl {
                path: (!path.is_empty()).then(|| PathBuf::from(path)),
            }
        }
        "http" => {
            let endpoint = Text::new("Endpoint URL to POST readings to:").prompt()?;
            StorageConfig::Http { endpoint: endpoint.trim().to_string() }
        }
        _ => StorageConfig::None,
    };

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}

fn index_of<T: PartialEq>(items: &[T], item: &T) -> usize {
    items.iter().position(|i| i == item).unwrap_or(0)
}
