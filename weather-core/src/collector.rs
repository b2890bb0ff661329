//! Simulated data sources standing in for a weather API and a local sensor.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::{
    convert::TryFrom,
    fmt::Debug,
    ops::Range,
    sync::{Mutex, PoisonError},
};

use crate::{error::ParseError, model::Measurements};

const TEMPERATURE_C: Range<f64> = -10.0..40.0;
const HUMIDITY_PCT: Range<f64> = 50.0..100.0;
const PRESSURE_HPA: Range<f64> = 1013.0..1023.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SourceKind {
    #[default]
    Api,
    Sensor,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Api => "api",
            SourceKind::Sensor => "sensor",
        }
    }

    pub const fn all() -> &'static [SourceKind] {
        &[SourceKind::Api, SourceKind::Sensor]
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SourceKind {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "api" => Ok(SourceKind::Api),
            "sensor" => Ok(SourceKind::Sensor),
            _ => Err(ParseError::Source(value.to_string())),
        }
    }
}

/// Anything that can produce a temperature/humidity/pressure triple.
/// Values are not range-checked by the station.
pub trait Collector: Send + Sync + Debug {
    fn kind(&self) -> SourceKind;

    fn collect(&self) -> Measurements;
}

/// Draws uniformly distributed readings from fixed plausible ranges.
#[derive(Debug)]
pub struct SimulatedCollector {
    kind: SourceKind,
    rng: Mutex<StdRng>,
}

impl SimulatedCollector {
    pub fn new(kind: SourceKind) -> Self {
        Self { kind, rng: Mutex::new(StdRng::from_entropy()) }
    }

    /// Deterministic sequence, for tests and reproducible runs.
    pub fn seeded(kind: SourceKind, seed: u64) -> Self {
        Self { kind, rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl Collector for SimulatedCollector {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn collect(&self) -> Measurements {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        Measurements {
            temperature_c: rng.gen_range(TEMPERATURE_C),
            humidity_pct: rng.gen_range(HUMIDITY_PCT),
            pressure_hpa: rng.gen_range(PRESSURE_HPA),
        }
    }
}

/// Construct the collector for a source.
pub fn collector_for(kind: SourceKind) -> Box<dyn Collector> {
    Box::new(SimulatedCollector::new(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_kind_as_str_roundtrip() {
        for kind in SourceKind::all() {
            let parsed = SourceKind::try_from(kind.as_str()).expect("roundtrip should succeed");
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn source_kind_ignores_case() {
        assert_eq!(SourceKind::try_from("API"), Ok(SourceKind::Api));
        assert_eq!(SourceKind::try_from("Sensor"), Ok(SourceKind::Sensor));
    }

    #[test]
    fn unknown_source_error() {
        let err = SourceKind::try_from("satellite").unwrap_err();
        assert!(err.to_string().contains("Unknown data source"));
    }

    #[test]
    fn simulated_values_stay_in_range() {
        for kind in SourceKind::all() {
            let collector = SimulatedCollector::seeded(*kind, 7);
            assert_eq!(collector.kind(), *kind);

            for _ in 0..500 {
                let m = collector.collect();
                assert!(TEMPERATURE_C.contains(&m.temperature_c), "{m:?}");
                assert!(HUMIDITY_PCT.contains(&m.humidity_pct), "{m:?}");
                assert!(PRESSURE_HPA.contains(&m.pressure_hpa), "{m:?}");
            }
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = SimulatedCollector::seeded(SourceKind::Api, 42);
        let b = SimulatedCollector::seeded(SourceKind::Sensor, 42);

        for _ in 0..10 {
            assert_eq!(a.collect(), b.collect());
        }
    }

    #[test]
    fn collector_for_reports_kind() {
        assert_eq!(collector_for(SourceKind::Sensor).kind(), SourceKind::Sensor);
    }
}
