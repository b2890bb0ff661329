use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::units::{TemperatureScale, convert};

/// One set of raw measurements as produced by a collector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurements {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
}

impl Measurements {
    pub fn new(temperature_c: f64, humidity_pct: f64, pressure_hpa: f64) -> Self {
        Self { temperature_c, humidity_pct, pressure_hpa }
    }

    pub fn temperature(&self, scale: TemperatureScale) -> f64 {
        convert(self.temperature_c, TemperatureScale::Celsius, scale)
    }
}

/// Consistent view of the station: measurements and the condition derived
/// from the same write.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub measurements: Measurements,
    /// `None` until the first write.
    pub condition: Option<Condition>,
}

impl Snapshot {
    /// Print the last reading with the temperature shown in `scale`.
    pub fn render_report(
        &self,
        scale: TemperatureScale,
        out: &mut dyn std::io::Write,
    ) -> std::io::Result<()> {
        let m = &self.measurements;
        writeln!(out, "Last Weather Data:")?;
        writeln!(
            out,
            "Temperature ({}): {:.1}{}",
            scale,
            m.temperature(scale),
            scale.symbol()
        )?;
        writeln!(out, "Humidity: {:.1}%", m.humidity_pct)?;
        writeln!(out, "Pressure: {:.1} hPa", m.pressure_hpa)
    }
}

/// Row handed to a persistence sink, matching the
/// `weather_data (time, temperature, humidity, pressure)` layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReading {
    pub time: String,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
}

impl StoredReading {
    pub fn new(time: impl Into<String>, m: &Measurements) -> Self {
        Self {
            time: time.into(),
            temperature: m.temperature_c,
            humidity: m.humidity_pct,
            pressure: m.pressure_hpa,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_uses_requested_scale() {
        let snapshot = Snapshot {
            measurements: Measurements::new(30.0, 60.0, 1015.0),
            condition: Some(Condition::Sunny),
        };

        let mut out = Vec::new();
        snapshot.render_report(TemperatureScale::Fahrenheit, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Temperature (Fahrenheit): 86.0°F"));
        assert!(text.contains("Humidity: 60.0%"));
        assert!(text.contains("Pressure: 1015.0 hPa"));
    }

    #[test]
    fn stored_reading_keeps_celsius() {
        let row = StoredReading::new("2023-11-07 12:00:00", &Measurements::new(-3.5, 72.0, 1019.5));

        assert_eq!(row.time, "2023-11-07 12:00:00");
        assert_eq!(row.temperature, -3.5);
        assert_eq!(row.humidity, 72.0);
        assert_eq!(row.pressure, 1019.5);
    }
}
