//! Background hand-off of readings to a persistence sink.

use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, error, warn};

use crate::{
    model::{Measurements, StoredReading},
    store::ReadingStore,
};

/// Format of the `time` column written with every reading.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Queues readings for a worker task that writes them to a store.
///
/// Recording never blocks and never fails from the caller's point of view:
/// each reading is attempted at most once and store errors are logged and
/// dropped. The worker exits once every `Recorder` clone is dropped and the
/// queue is drained.
#[derive(Debug, Clone)]
pub struct Recorder {
    tx: mpsc::UnboundedSender<StoredReading>,
}

impl Recorder {
    /// Start the worker. Must be called from within a tokio runtime.
    pub fn spawn(store: Arc<dyn ReadingStore>) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<StoredReading>();

        let worker = tokio::spawn(async move {
            while let Some(reading) = rx.recv().await {
                match store.store(&reading).await {
                    Ok(()) => debug!(time = %reading.time, "reading persisted"),
                    Err(err) => error!(time = %reading.time, error = %err, "failed to persist reading"),
                }
            }
            debug!("recorder queue closed");
        });

        (Self { tx }, worker)
    }

    pub fn record(&self, measurements: &Measurements) {
        self.record_at(timestamp_now(), measurements);
    }

    pub fn record_at(&self, time: String, measurements: &Measurements) {
        if self.tx.send(StoredReading::new(time, measurements)).is_err() {
            warn!("recorder worker has stopped, reading not persisted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::StoreError, store::MemoryStore};
    use async_trait::async_trait;
    use chrono::NaiveDateTime;

    #[derive(Debug)]
    struct BrokenStore;

    #[async_trait]
    impl ReadingStore for BrokenStore {
        async fn store(&self, _reading: &StoredReading) -> Result<(), StoreError> {
            Err(StoreError::Rejected { endpoint: "test".into(), status: 503 })
        }
    }

    #[test]
    fn timestamp_has_expected_shape() {
        let ts = timestamp_now();
        assert!(NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok(), "{ts}");
    }

    #[tokio::test]
    async fn worker_drains_queue_before_exit() {
        let store = MemoryStore::new();
        let (recorder, worker) = Recorder::spawn(Arc::new(store.clone()));

        recorder.record_at("t1".into(), &Measurements::new(1.0, 2.0, 3.0));
        recorder.record_at("t2".into(), &Measurements::new(4.0, 5.0, 6.0));
        drop(recorder);
        worker.await.unwrap();

        let times: Vec<_> = store.readings().into_iter().map(|r| r.time).collect();
        assert_eq!(times, vec!["t1", "t2"]);
    }

    #[tokio::test]
    async fn store_failures_do_not_stop_worker() {
        let (recorder, worker) = Recorder::spawn(Arc::new(BrokenStore));

        recorder.record(&Measurements::new(1.0, 2.0, 3.0));
        recorder.record(&Measurements::new(4.0, 5.0, 6.0));
        drop(recorder);

        assert!(worker.await.is_ok());
    }
}
