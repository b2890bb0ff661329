//! The interactive monitoring loop.

use inquire::{CustomType, InquireError, Select};
use std::{
    fmt,
    io::{self, Write},
    sync::Arc,
};
use weather_core::{
    Collector, SourceKind, StationError, TemperatureScale, Update, WeatherStation, collector_for,
    to_celsius,
};

const RULE: &str = "<==============================================================>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Collect,
    ChooseScale,
    SetAlert,
    ChangeSource,
    ShowData,
    ShowCondition,
    Quit,
}

impl MenuItem {
    const ALL: [MenuItem; 7] = [
        MenuItem::Collect,
        MenuItem::ChooseScale,
        MenuItem::SetAlert,
        MenuItem::ChangeSource,
        MenuItem::ShowData,
        MenuItem::ShowCondition,
        MenuItem::Quit,
    ];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuItem::Collect => "Collect weather data",
            MenuItem::ChooseScale => "Choose temperature scale (Celsius/Fahrenheit/Kelvin)",
            MenuItem::SetAlert => "Set temperature alert threshold",
            MenuItem::ChangeSource => "Change data source (API/Sensor)",
            MenuItem::ShowData => "Display weather data",
            MenuItem::ShowCondition => "Display weather condition",
            MenuItem::Quit => "Quit",
        })
    }
}

/// Resolve a scale name typed by the user, announcing the Celsius fallback.
pub fn scale_or_default(name: &str) -> TemperatureScale {
    if TemperatureScale::try_from(name).is_err() {
        println!("Invalid temperature scale '{name}'. Using the default scale (Celsius).");
    }
    TemperatureScale::parse_or_default(name)
}

/// State of one interactive run.
pub struct Session {
    station: Arc<WeatherStation>,
    scale: TemperatureScale,
    collector: Box<dyn Collector>,
}

impl Session {
    pub fn new(station: Arc<WeatherStation>, scale: TemperatureScale, source: SourceKind) -> Self {
        Self { station, scale, collector: collector_for(source) }
    }

    /// Loop until the user quits or cancels a prompt.
    pub fn run(mut self) -> anyhow::Result<()> {
        println!("Weather Monitoring and Alert System");

        loop {
            println!("<=======================Welcome=======================>");

            let Some(choice) = cancellable(Select::new("Menu:", MenuItem::ALL.to_vec()).prompt())?
            else {
                break;
            };

            let keep_going = match choice {
                MenuItem::Collect => {
                    self.collect()?;
                    true
                }
                MenuItem::ChooseScale => self.choose_scale()?,
                MenuItem::SetAlert => self.set_alert()?,
                MenuItem::ChangeSource => self.change_source()?,
                MenuItem::ShowData => {
                    self.show_data()?;
                    true
                }
                MenuItem::ShowCondition => {
                    self.show_condition()?;
                    true
                }
                MenuItem::Quit => false,
            };

            if !keep_going {
                break;
            }
        }

        Ok(())
    }

    fn collect(&self) -> anyhow::Result<()> {
        let update = self.station.collect_from(self.collector.as_ref());
        print_update(&update, self.scale, &mut io::stdout().lock())?;
        Ok(())
    }

    fn choose_scale(&mut self) -> anyhow::Result<bool> {
        let prompt = Select::new("Choose temperature scale:", TemperatureScale::all().to_vec())
            .prompt();

        Ok(match cancellable(prompt)? {
            Some(scale) => {
                self.scale = scale;
                println!("Temperatures will be shown in {scale}.");
                true
            }
            None => false,
        })
    }

    fn set_alert(&self) -> anyhow::Result<bool> {
        let prompt = CustomType::<f64>::new(&format!(
            "Enter a new temperature threshold ({}):",
            self.scale
        ))
        .with_error_message("Please type a number")
        .prompt();

        Ok(match cancellable(prompt)? {
            Some(value) => {
                let sub = self.station.subscribe(to_celsius(value, self.scale));
                println!(
                    "Alert {} set: warn when temperature drops below {}°C.",
                    sub.id(),
                    sub.threshold_c()
                );
                true
            }
            None => false,
        })
    }

    fn change_source(&mut self) -> anyhow::Result<bool> {
        let prompt = Select::new("Choose data source:", SourceKind::all().to_vec()).prompt();

        match cancellable(prompt)? {
            Some(source) => {
                self.collector = collector_for(source);
                println!("Collecting from {source}.");
                self.collect()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn show_data(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{RULE}")?;
        self.station.snapshot().render_report(self.scale, &mut out)?;
        writeln!(out, "{RULE}")
    }

    fn show_condition(&self) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        match self.station.display_condition(&mut out) {
            Ok(()) => Ok(()),
            Err(StationError::NoReading) => {
                writeln!(out, "No weather data has been collected yet.")?;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn print_update(update: &Update, scale: TemperatureScale, out: &mut dyn Write) -> io::Result<()> {
    let m = &update.snapshot.measurements;
    writeln!(
        out,
        "Collected: {:.1}{}, {:.1}% humidity, {:.1} hPa",
        m.temperature(scale),
        scale.symbol(),
        m.humidity_pct,
        m.pressure_hpa
    )?;

    for alert in &update.alerts {
        writeln!(out, "{alert}")?;
    }

    Ok(())
}

/// Esc and Ctrl-C end the session instead of failing it.
fn cancellable<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_lists_alerts_after_reading() {
        let station = WeatherStation::new();
        station.subscribe(10.0);
        station.subscribe(0.0);
        let update = station.set_measurements(5.0, 61.0, 1017.0);

        let mut out = Vec::new();
        print_update(&update, TemperatureScale::Fahrenheit, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "Collected: 41.0°F, 61.0% humidity, 1017.0 hPa\n\
             Temperature is below 10°C. Warning!\n"
        );
    }

    #[test]
    fn cancel_and_interrupt_end_the_session() {
        assert!(cancellable::<u8>(Err(InquireError::OperationCanceled)).unwrap().is_none());
        assert!(cancellable::<u8>(Err(InquireError::OperationInterrupted)).unwrap().is_none());
        assert_eq!(cancellable(Ok(3)).unwrap(), Some(3));
    }

    #[test]
    fn unknown_scale_name_falls_back() {
        assert_eq!(scale_or_default("Réaumur"), TemperatureScale::Celsius);
        assert_eq!(scale_or_default("kelvin"), TemperatureScale::Kelvin);
    }

    #[test]
    fn menu_lists_every_action_once() {
        let labels: Vec<_> = MenuItem::ALL.iter().map(|i| i.to_string()).collect();
        let mut deduped = labels.clone();
        deduped.dedup();

        assert_eq!(labels.len(), 7);
        assert_eq!(labels, deduped);
    }
}
