//! Temperature scales and conversion between them.
//!
//! Celsius is the canonical unit everywhere else in the crate; the other
//! scales only exist at display and input boundaries.

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use tracing::warn;

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TemperatureScale {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureScale {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "Celsius",
            TemperatureScale::Fahrenheit => "Fahrenheit",
            TemperatureScale::Kelvin => "Kelvin",
        }
    }

    /// Unit suffix used when printing a value in this scale.
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "°C",
            TemperatureScale::Fahrenheit => "°F",
            TemperatureScale::Kelvin => "K",
        }
    }

    pub const fn all() -> &'static [TemperatureScale] {
        &[
            TemperatureScale::Celsius,
            TemperatureScale::Fahrenheit,
            TemperatureScale::Kelvin,
        ]
    }

    /// Parse a scale name, falling back to Celsius for anything unrecognized.
    ///
    /// Unknown names are not an error at conversion sites: a warning is logged
    /// and the value is treated as Celsius.
    pub fn parse_or_default(name: &str) -> Self {
        match TemperatureScale::try_from(name) {
            Ok(scale) => scale,
            Err(_) => {
                warn!(scale = name, "invalid temperature scale, using the default scale (Celsius)");
                TemperatureScale::Celsius
            }
        }
    }
}

impl std::fmt::Display for TemperatureScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TemperatureScale {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "celsius" => Ok(TemperatureScale::Celsius),
            "fahrenheit" => Ok(TemperatureScale::Fahrenheit),
            "kelvin" => Ok(TemperatureScale::Kelvin),
            _ => Err(ParseError::Scale(value.to_string())),
        }
    }
}

/// Convert `value` from one scale to another.
pub fn convert(value: f64, from: TemperatureScale, to: TemperatureScale) -> f64 {
    use TemperatureScale::*;

    match (from, to) {
        (Celsius, Celsius) | (Fahrenheit, Fahrenheit) | (Kelvin, Kelvin) => value,
        (Celsius, Fahrenheit) => value * 9.0 / 5.0 + 32.0,
        (Celsius, Kelvin) => value + 273.15,
        (Fahrenheit, Celsius) => (value - 32.0) * 5.0 / 9.0,
        (Fahrenheit, Kelvin) => (value + 459.67) * 5.0 / 9.0,
        (Kelvin, Celsius) => value - 273.15,
        (Kelvin, Fahrenheit) => value * 9.0 / 5.0 - 459.67,
    }
}

/// Convert a value given in `from` into Celsius.
pub fn to_celsius(value: f64, from: TemperatureScale) -> f64 {
    convert(value, from, TemperatureScale::Celsius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn scale_as_str_roundtrip() {
        for scale in TemperatureScale::all() {
            let parsed = TemperatureScale::try_from(scale.as_str()).expect("roundtrip should succeed");
            assert_eq!(*scale, parsed);
        }
    }

    #[test]
    fn scale_parsing_ignores_case() {
        assert_eq!(TemperatureScale::try_from("KELVIN"), Ok(TemperatureScale::Kelvin));
        assert_eq!(TemperatureScale::try_from("fahrenheit"), Ok(TemperatureScale::Fahrenheit));
    }

    #[test]
    fn unknown_scale_is_strict_error() {
        let err = TemperatureScale::try_from("Rankine").unwrap_err();
        assert!(err.to_string().contains("Unknown temperature scale"));
    }

    #[test]
    fn unknown_scale_defaults_to_celsius() {
        assert_eq!(TemperatureScale::parse_or_default("Rankine"), TemperatureScale::Celsius);
        assert_eq!(TemperatureScale::parse_or_default(""), TemperatureScale::Celsius);
        assert_eq!(TemperatureScale::parse_or_default("kelvin"), TemperatureScale::Kelvin);
    }

    #[test]
    fn known_reference_points() {
        use TemperatureScale::*;

        assert!(approx(convert(30.0, Celsius, Fahrenheit), 86.0));
        assert!(approx(convert(0.0, Celsius, Kelvin), 273.15));
        assert!(approx(convert(212.0, Fahrenheit, Celsius), 100.0));
        assert!(approx(convert(-459.67, Fahrenheit, Kelvin), 0.0));
        assert!(approx(convert(0.0, Kelvin, Celsius), -273.15));
        assert!(approx(convert(0.0, Kelvin, Fahrenheit), -459.67));
        assert!(approx(convert(-40.0, Celsius, Fahrenheit), -40.0));
    }

    #[test]
    fn same_scale_is_identity() {
        for scale in TemperatureScale::all() {
            assert_eq!(convert(12.34, *scale, *scale), 12.34);
        }
    }

    #[test]
    fn conversions_roundtrip_between_all_pairs() {
        let samples = [-273.15, -40.0, -0.5, 0.0, 15.0, 25.0001, 100.0, 1.0e4];

        for from in TemperatureScale::all() {
            for to in TemperatureScale::all() {
                for v in samples {
                    let back = convert(convert(v, *from, *to), *to, *from);
                    assert!(approx(back, v), "{from} -> {to} -> {from}: {v} became {back}");
                }
            }
        }
    }

    #[test]
    fn threshold_entered_in_fahrenheit_lands_in_celsius() {
        assert!(approx(to_celsius(50.0, TemperatureScale::Fahrenheit), 10.0));
        assert!(approx(to_celsius(283.15, TemperatureScale::Kelvin), 10.0));
    }
}
