use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::{collector::SourceKind, units::TemperatureScale};

/// Where readings go after each update.
///
/// Example TOML:
/// [storage]
/// kind = "http"
/// endpoint = "http://localhost:8080/readings"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Append to a JSON-lines file; `path` defaults to the platform data dir.
    Jsonl {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
    },
    Http { endpoint: String },
    None,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Jsonl { path: None }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display scale name. Unknown names fall back to Celsius when used.
    pub scale: String,

    /// Data source short name, "api" or "sensor".
    pub source: String,

    /// Optional `EnvFilter` directive, overridden by `RUST_LOG`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,

    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scale: TemperatureScale::Celsius.as_str().to_string(),
            source: SourceKind::Api.as_str().to_string(),
            log_filter: None,
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Display scale, applying the Celsius fallback for unknown names.
    pub fn scale(&self) -> TemperatureScale {
        TemperatureScale::parse_or_default(&self.scale)
    }

    pub fn set_scale(&mut self, scale: TemperatureScale) {
        self.scale = scale.as_str().to_string();
    }

    /// Return the configured source as a strongly-typed SourceKind.
    pub fn source_kind(&self) -> Result<SourceKind> {
        SourceKind::try_from(self.source.as_str()).map_err(|e| {
            anyhow!("{e}\nHint: run `weather-monitor configure` to pick a data source.")
        })
    }

    pub fn set_source(&mut self, kind: SourceKind) {
        self.source = kind.as_str().to_string();
    }

    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-monitor", "weather-monitor")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Default location of the JSON-lines reading log.
    pub fn default_readings_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("readings.jsonl"))
    }
}
