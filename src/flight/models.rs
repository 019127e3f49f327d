use crate::flight::duration::{FlightDuration, compute_duration};
use crate::flight::timezone::{DEFAULT_TIMEZONE, parse_timezone_offset};
use crate::utils::serde_compat::{lenient_duration, optional_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

/// One flight leg embedded in a trip.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightLeg {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "optional_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub airline: String,
    #[serde(default)]
    pub flight_number: String,
    #[serde(default)]
    pub departure_city: String,
    #[serde(default)]
    pub arrival_city: String,
    /// Local clock time at departure, `HH:MM`
    #[serde(default)]
    pub departure_time: String,
    /// Local clock time at arrival, `HH:MM`
    #[serde(default)]
    pub arrival_time: String,
    #[serde(default = "default_timezone")]
    pub departure_timezone: String,
    #[serde(default = "default_timezone")]
    pub arrival_timezone: String,
    #[serde(default, deserialize_with = "lenient_duration")]
    pub duration: Option<FlightDuration>,
}

impl Default for FlightLeg {
    fn default() -> Self {
        Self {
            id: String::new(),
            date: None,
            airline: String::new(),
            flight_number: String::new(),
            departure_city: String::new(),
            arrival_city: String::new(),
            departure_time: String::new(),
            arrival_time: String::new(),
            departure_timezone: default_timezone(),
            arrival_timezone: default_timezone(),
            duration: None,
        }
    }
}

impl FlightLeg {
    pub fn departure_offset_hours(&self) -> f64 {
        parse_timezone_offset(&self.departure_timezone)
    }

    pub fn arrival_offset_hours(&self) -> f64 {
        parse_timezone_offset(&self.arrival_timezone)
    }

    pub fn calculate_duration(&self) -> Option<FlightDuration> {
        compute_duration(
            &self.departure_time,
            &self.arrival_time,
            self.departure_offset_hours(),
            self.arrival_offset_hours(),
        )
    }

    /// Refresh the stored duration from the current times and timezones.
    pub fn recompute_duration(&mut self) {
        self.duration = self.calculate_duration();
    }

    /// Fill in a duration only when none is stored yet.
    pub fn ensure_duration(&mut self) {
        if self.duration.is_none() {
            self.recompute_duration();
        }
    }

    pub fn route(&self) -> String {
        format!("{} → {}", self.departure_city, self.arrival_city)
    }
}

fn compare_flights(a: &FlightLeg, b: &FlightLeg) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| a.departure_time.cmp(&b.departure_time))
}

/// Order legs by date, then by departure time. Undated legs come first.
pub fn sort_flights(flights: &mut [FlightLeg]) {
    flights.sort_by(compare_flights);
}
