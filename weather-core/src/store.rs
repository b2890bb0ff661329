//! Persistence sinks for readings.
//!
//! A sink receives one [`StoredReading`] per successful write to the
//! station. Sinks may be slow or fail; they are always driven through a
//! [`Recorder`](crate::recorder::Recorder) so neither affects the station.

use async_trait::async_trait;
use reqwest::Client;
use std::{
    fmt::Debug,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};
use tokio::io::AsyncWriteExt;

use crate::{config::{Config, StorageConfig}, error::StoreError, model::StoredReading};

#[async_trait]
pub trait ReadingStore: Send + Sync + Debug {
    async fn store(&self, reading: &StoredReading) -> Result<(), StoreError>;
}

/// Appends each reading as one JSON object per line.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io { path: self.path.display().to_string(), source }
    }
}

#[async_trait]
impl ReadingStore for JsonlStore {
    async fn store(&self, reading: &StoredReading) -> Result<(), StoreError> {
        let mut line = serde_json::to_vec(reading)?;
        line.push(b'\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| self.io_error(e))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        file.write_all(&line).await.map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))
    }
}

/// POSTs each reading as JSON to a collection endpoint.
#[derive(Debug, Clone)]
pub struct HttpStore {
    endpoint: String,
    http: Client,
}

impl HttpStore {
    pub fn new(endpoint: String) -> Self {
        Self { endpoint, http: Client::new() }
    }
}

#[async_trait]
impl ReadingStore for HttpStore {
    async fn store(&self, reading: &StoredReading) -> Result<(), StoreError> {
        let res = self
            .http
            .post(&self.endpoint)
            .json(reading)
            .send()
            .await
            .map_err(|source| StoreError::Http { endpoint: self.endpoint.clone(), source })?;

        let status = res.status();
        if !status.is_success() {
            return Err(StoreError::Rejected {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

/// Keeps readings in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Arc<Mutex<Vec<StoredReading>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn readings(&self) -> Vec<StoredReading> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl ReadingStore for MemoryStore {
    async fn store(&self, reading: &StoredReading) -> Result<(), StoreError> {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(reading.clone());
        Ok(())
    }
}

/// Construct the configured sink, or `None` when persistence is disabled.
pub fn store_from_config(config: &Config) -> anyhow::Result<Option<Arc<dyn ReadingStore>>> {
    let store: Arc<dyn ReadingStore> = match &config.storage {
        StorageConfig::None => return Ok(None),
        StorageConfig::Jsonl { path: Some(path) } => Arc::new(JsonlStore::new(path.clone())),
        StorageConfig::Jsonl { path: None } => {
            Arc::new(JsonlStore::new(Config::default_readings_path()?))
        }
        StorageConfig::Http { endpoint } => Arc::new(HttpStore::new(endpoint.clone())),
    };

    Ok(Some(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Measurements;

    fn row(time: &str, t: f64) -> StoredReading {
        StoredReading::new(time, &Measurements::new(t, 55.0, 1014.0))
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("weather-core-{}-{}", std::process::id(), name))
            .join("readings.jsonl")
    }

    #[tokio::test]
    async fn jsonl_store_appends_one_line_per_reading() {
        let path = scratch_path("append");
        let _ = std::fs::remove_file(&path);
        let store = JsonlStore::new(&path);

        store.store(&row("2023-11-07 12:00:00", 21.5)).await.unwrap();
        store.store(&row("2023-11-07 12:05:00", -2.0)).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let rows: Vec<StoredReading> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(rows, vec![row("2023-11-07 12:00:00", 21.5), row("2023-11-07 12:05:00", -2.0)]);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn jsonl_store_reports_unwritable_path() {
        let dir = scratch_path("blocked");
        let blocker = dir.parent().unwrap().to_path_buf();
        let _ = std::fs::remove_dir_all(&blocker);
        std::fs::create_dir_all(blocker.parent().unwrap()).unwrap();
        // A regular file where the directory should be.
        std::fs::write(&blocker, b"").unwrap();

        let err = JsonlStore::new(&dir).store(&row("t", 1.0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));

        let _ = std::fs::remove_file(&blocker);
    }

    #[tokio::test]
    async fn memory_store_clones_share_rows() {
        let store = MemoryStore::new();
        let handle = store.clone();

        store.store(&row("a", 1.0)).await.unwrap();

        assert_eq!(handle.readings(), vec![row("a", 1.0)]);
    }

    #[test]
    fn disabled_storage_builds_no_store() {
        let cfg = Config { storage: StorageConfig::None, ..Config::default() };
        assert!(store_from_config(&cfg).unwrap().is_none());
    }

    #[test]
    fn explicit_jsonl_path_is_used() {
        let cfg = Config {
            storage: StorageConfig::Jsonl { path: Some(PathBuf::from("/tmp/w.jsonl")) },
            ..Config::default()
        };
        assert!(store_from_config(&cfg).unwrap().is_some());
    }
}
