//! The shared weather reading and its update protocol.
//!
//! A [`WeatherStation`] owns exactly one reading: the latest measurements,
//! the condition derived from them, and the ordered list of alert
//! subscriptions. It is normally built once by the entry point and shared as
//! an `Arc`; [`WeatherStation::global`] provides a lazily created
//! process-wide instance for callers that cannot have one injected.
//!
//! All state sits behind a single `RwLock`. Readers may run concurrently, but
//! a write replaces the measurements, reclassifies and runs the alert fan-out
//! under the write lock, so nobody can observe measurements from one update
//! paired with the condition of another.

use std::{
    io::Write,
    sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tracing::debug;

use crate::{
    alert::{Alert, AlertSubscription, Notifier},
    collector::Collector,
    condition::{Condition, classify},
    error::StationError,
    model::{Measurements, Snapshot},
    recorder::Recorder,
    units::TemperatureScale,
};

#[derive(Debug, Default)]
struct State {
    measurements: Measurements,
    condition: Option<Condition>,
    notifier: Notifier,
}

/// Result of a single write.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub snapshot: Snapshot,
    /// Alerts that fired, in subscription order.
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Default)]
pub struct WeatherStation {
    state: RwLock<State>,
    recorder: Option<Recorder>,
}

static GLOBAL: OnceLock<Arc<WeatherStation>> = OnceLock::new();

impl WeatherStation {
    /// Zeroed measurements and no condition until the first write.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand every successful write to `recorder` for persistence.
    pub fn with_recorder(recorder: Recorder) -> Self {
        Self { recorder: Some(recorder), ..Self::default() }
    }

    /// The process-wide station, created on first use.
    pub fn global() -> Arc<WeatherStation> {
        GLOBAL.get_or_init(|| Arc::new(WeatherStation::new())).clone()
    }

    // Every write replaces the whole group, so a poisoned lock still holds
    // a consistent state.
    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The only mutation entry point: store all three values, reclassify,
    /// then notify subscribers in registration order.
    pub fn set_measurements(&self, temperature_c: f64, humidity_pct: f64, pressure_hpa: f64) -> Update {
        let measurements = Measurements::new(temperature_c, humidity_pct, pressure_hpa);

        let update = {
            let mut state = self.write();
            state.measurements = measurements;
            state.condition = Some(classify(temperature_c));

            let alerts = state.notifier.notify(&measurements);

            Update {
                snapshot: Snapshot { measurements, condition: state.condition },
                alerts,
            }
        };

        debug!(
            temperature_c,
            humidity_pct,
            pressure_hpa,
            condition = ?update.snapshot.condition,
            alerts = update.alerts.len(),
            "measurements updated"
        );

        if let Some(recorder) = &self.recorder {
            recorder.record(&measurements);
        }

        update
    }

    /// Pull one reading from `collector` and write it.
    pub fn collect_from(&self, collector: &dyn Collector) -> Update {
        let m = collector.collect();
        debug!(source = %collector.kind(), "collected reading");
        self.set_measurements(m.temperature_c, m.humidity_pct, m.pressure_hpa)
    }

    /// Register a watcher that fires on future writes whose temperature is
    /// below `threshold_c`. The current reading is not checked.
    pub fn subscribe(&self, threshold_c: f64) -> AlertSubscription {
        let subscription = self.write().notifier.subscribe(threshold_c);
        debug!(id = %subscription.id(), threshold_c, "alert subscription added");
        subscription
    }

    pub fn subscriptions(&self) -> Vec<AlertSubscription> {
        self.read().notifier.subscriptions().to_vec()
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.read();
        Snapshot { measurements: state.measurements, condition: state.condition }
    }

    pub fn temperature(&self, scale: TemperatureScale) -> f64 {
        self.read().measurements.temperature(scale)
    }

    pub fn temperature_celsius(&self) -> f64 {
        self.read().measurements.temperature_c
    }

    pub fn temperature_fahrenheit(&self) -> f64 {
        self.temperature(TemperatureScale::Fahrenheit)
    }

    pub fn temperature_kelvin(&self) -> f64 {
        self.temperature(TemperatureScale::Kelvin)
    }

    pub fn humidity(&self) -> f64 {
        self.read().measurements.humidity_pct
    }

    pub fn pressure(&self) -> f64 {
        self.read().measurements.pressure_hpa
    }

    pub fn condition(&self) -> Option<Condition> {
        self.read().condition
    }

    /// Write the current condition line to `out`.
    pub fn display_condition(&self, out: &mut dyn Write) -> Result<(), StationError> {
        let condition = self.condition().ok_or(StationError::NoReading)?;
        condition.render(out)?;
        Ok(())
    }
}
