//! Qualitative weather condition derived from temperature alone.

use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
}

/// Tiers checked top-down; a temperature must be strictly above the bound
/// to land in the tier, so boundary values fall into the next one down.
const TIERS: &[(f64, Condition)] = &[
    (25.0, Condition::Sunny),
    (15.0, Condition::Cloudy),
    (0.0, Condition::Rainy),
];

/// Returned when no tier matches, including for NaN.
const FALLBACK: Condition = Condition::Snowy;

/// Classify a Celsius temperature.
pub fn classify(temperature_c: f64) -> Condition {
    TIERS
        .iter()
        .find(|(bound, _)| temperature_c > *bound)
        .map(|(_, condition)| *condition)
        .unwrap_or(FALLBACK)
}

impl Condition {
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Sunny => "Sunny",
            Condition::Cloudy => "Cloudy",
            Condition::Rainy => "Rainy",
            Condition::Snowy => "Snowy",
        }
    }

    pub const fn all() -> &'static [Condition] {
        &[
            Condition::Sunny,
            Condition::Cloudy,
            Condition::Rainy,
            Condition::Snowy,
        ]
    }

    /// Write the user-facing line for this condition.
    pub fn render(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "Weather: {}", self.label())
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
