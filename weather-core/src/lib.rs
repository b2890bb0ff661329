//! Core library for the `weather-monitor` console.
//!
//! This crate defines:
//! - Temperature scales and conversion between them
//! - Condition classification from temperature
//! - The shared weather station with threshold alert fan-out
//! - Simulated data collectors and persistence sinks
//! - Configuration handling
//!
//! It is used by `weather-cli`, but can also be embedded in other binaries or services.

pub mod alert;
pub mod collector;
pub mod condition;
pub mod config;
pub mod error;
pub mod model;
pub mod recorder;
pub mod station;
pub mod store;
pub mod units;

pub use alert::{Alert, AlertSubscription, Notifier, SubscriptionId};
pub use collector::{Collector, SimulatedCollector, SourceKind, collector_for};
pub use condition::{Condition, classify};
pub use config::{Config, StorageConfig};
pub use error::{ParseError, StationError, StoreError};
pub use model::{Measurements, Snapshot, StoredReading};
pub use recorder::Recorder;
pub use station::{Update, WeatherStation};
pub use store::{HttpStore, JsonlStore, MemoryStore, ReadingStore, store_from_config};
pub use units::{TemperatureScale, convert, to_celsius};
