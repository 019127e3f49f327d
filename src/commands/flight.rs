use crate::OutputFormat;
use crate::commands::{open_store, print_json};
use crate::config::Config;
use crate::error::Error;
use crate::flight::duration::compute_duration;
use crate::flight::models::FlightLeg;
use crate::flight::timezone::{timezone_options, try_parse_timezone_offset};
use crate::trip::TripBook;
use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct FlightArgs {
    #[arg(long = "dep", help = "Local departure time (HH:MM, 24-hour)")]
    pub departure_time: String,
    #[arg(long = "arr", help = "Local arrival time (HH:MM, 24-hour)")]
    pub arrival_time: String,
    #[arg(long, help = "Flight date (YYYY-MM-DD)")]
    pub date: Option<NaiveDate>,
    #[arg(long, default_value = "")]
    pub airline: String,
    #[arg(long = "number", default_value = "")]
    pub flight_number: String,
    #[arg(long = "from-city", default_value = "")]
    pub departure_city: String,
    #[arg(long = "to-city", default_value = "")]
    pub arrival_city: String,
    #[arg(
        long = "from-tz",
        allow_negative_numbers = true,
        help = "Departure timezone label or UTC offset, e.g. 'UTC+8' or -3"
    )]
    pub departure_timezone: Option<String>,
    #[arg(
        long = "to-tz",
        allow_negative_numbers = true,
        help = "Arrival timezone label or UTC offset, e.g. 'UTC+9' or -3"
    )]
    pub arrival_timezone: Option<String>,
}

impl FlightArgs {
    fn into_leg(self, default_timezone: &str) -> Result<FlightLeg, Error> {
        let departure_timezone = match self.departure_timezone {
            Some(tz) => timezone_label(&tz)?,
            None => default_timezone.to_string(),
        };
        let arrival_timezone = match self.arrival_timezone {
            Some(tz) => timezone_label(&tz)?,
            None => default_timezone.to_string(),
        };
        Ok(FlightLeg {
            date: self.date,
            airline: self.airline,
            flight_number: self.flight_number,
            departure_city: self.departure_city,
            arrival_city: self.arrival_city,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            departure_timezone,
            arrival_timezone,
            ..FlightLeg::default()
        })
    }
}

/// Changes to an existing flight leg. Omitted fields keep their value.
#[derive(Args, Debug, Clone, Default)]
pub struct FlightEditArgs {
    #[arg(long = "dep", help = "Local departure time (HH:MM, 24-hour)")]
    pub departure_time: Option<String>,
    #[arg(long = "arr", help = "Local arrival time (HH:MM, 24-hour)")]
    pub arrival_time: Option<String>,
    #[arg(long, help = "Flight date (YYYY-MM-DD)")]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub airline: Option<String>,
    #[arg(long = "number")]
    pub flight_number: Option<String>,
    #[arg(long = "from-city")]
    pub departure_city: Option<String>,
    #[arg(long = "to-city")]
    pub arrival_city: Option<String>,
    #[arg(long = "from-tz", allow_negative_numbers = true)]
    pub departure_timezone: Option<String>,
    #[arg(long = "to-tz", allow_negative_numbers = true)]
    pub arrival_timezone: Option<String>,
}

impl FlightEditArgs {
    fn apply(self, leg: &mut FlightLeg) -> Result<(), Error> {
        if let Some(tz) = self.departure_timezone {
            leg.departure_timezone = timezone_label(&tz)?;
        }
        if let Some(tz) = self.arrival_timezone {
            leg.arrival_timezone = timezone_label(&tz)?;
        }
        if let Some(time) = self.departure_time {
            leg.departure_time = time;
        }
        if let Some(time) = self.arrival_time {
            leg.arrival_time = time;
        }
        if let Some(date) = self.date {
            leg.date = Some(date);
        }
        if let Some(airline) = self.airline {
            leg.airline = airline;
        }
        if let Some(number) = self.flight_number {
            leg.flight_number = number;
        }
        if let Some(city) = self.departure_city {
            leg.departure_city = city;
        }
        if let Some(city) = self.arrival_city {
            leg.arrival_city = city;
        }
        Ok(())
    }
}

/// Offset from a label (`UTC+5.5 (India)`) or a bare number (`5.5`, `-3`).
pub fn offset_from_arg(value: &str) -> Result<f64, Error> {
    try_parse_timezone_offset(value)
        .or_else(|| value.trim().parse::<f64>().ok().filter(|o| o.is_finite()))
        .ok_or_else(|| Error::InvalidTimezone(value.to_string()))
}

/// Label to store on a leg. Bare offsets become `UTC-3`, `UTC+5.5`.
fn timezone_label(value: &str) -> Result<String, Error> {
    if try_parse_timezone_offset(value).is_some() {
        return Ok(value.to_string());
    }
    let offset = offset_from_arg(value)?;
    let sign = if offset.is_sign_negative() { "" } else { "+" };
    Ok(format!("UTC{}{}", sign, offset))
}

pub fn duration(
    config: &Config,
    departure_time: &str,
    arrival_time: &str,
    departure_timezone: Option<String>,
    arrival_timezone: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let default_tz = &config.flights.default_timezone;
    let departure_offset = offset_from_arg(departure_timezone.as_deref().unwrap_or(default_tz))?;
    let arrival_offset = offset_from_arg(arrival_timezone.as_deref().unwrap_or(default_tz))?;

    let result = compute_duration(
        departure_time,
        arrival_time,
        departure_offset,
        arrival_offset,
    );

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Text => match result {
            Some(d) => println!("Flight time: {}", d),
            None => println!("Flight time: -- (enter both times as HH:MM)"),
        },
    }
    Ok(())
}

pub fn timezones(format: OutputFormat) -> Result<()> {
    let options = timezone_options();
    match format {
        OutputFormat::Json => print_json(&options)?,
        OutputFormat::Text => {
            for label in options {
                println!("{}", label);
            }
        }
    }
    Ok(())
}

pub fn add(config: &Config, trip_id: &str, args: FlightArgs) -> Result<()> {
    let store = open_store(config)?;
    let leg = args.into_leg(&config.flights.default_timezone)?;

    let (flight_id, duration) = store.update::<TripBook, _, _>(|book| {
        let id = book.add_flight(trip_id, leg)?;
        let duration = book.get(trip_id)?.flight(&id).and_then(|f| f.duration);
        Ok((id, duration))
    })?;

    match duration {
        Some(d) => println!("✓ Added flight {} to trip {} ({})", flight_id, trip_id, d),
        None => println!("✓ Added flight {} to trip {}", flight_id, trip_id),
    }
    Ok(())
}

pub fn edit(config: &Config, trip_id: &str, flight_id: &str, args: FlightEditArgs) -> Result<()> {
    let store = open_store(config)?;

    let leg = store.update::<TripBook, _, _>(|book| {
        let mut leg = book
            .get(trip_id)?
            .flight(flight_id)
            .cloned()
            .ok_or_else(|| Error::FlightNotFound {
                trip_id: trip_id.to_string(),
                flight_id: flight_id.to_string(),
            })?;
        args.apply(&mut leg)?;
        book.update_flight(trip_id, leg)?;
        Ok(book.get(trip_id)?.flight(flight_id).cloned())
    })?;

    match leg.and_then(|f| f.duration) {
        Some(d) => println!("✓ Updated flight {} in trip {} ({})", flight_id, trip_id, d),
        None => println!("✓ Updated flight {} in trip {}", flight_id, trip_id),
    }
    Ok(())
}

pub fn remove(config: &Config, trip_id: &str, flight_id: &str) -> Result<()> {
    let store = open_store(config)?;
    let removed =
        store.update::<TripBook, _, _>(|book| Ok(book.remove_flight(trip_id, flight_id)?))?;
    println!(
        "✓ Removed flight {} {}",
        removed.flight_number,
        removed.route()
    );
    Ok(())
}
