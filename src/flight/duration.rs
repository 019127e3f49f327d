use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Elapsed flight time in whole hours and minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightDuration {
    pub hours: u32,
    pub minutes: u32,
}

impl FlightDuration {
    pub fn total_minutes(&self) -> u32 {
        self.hours * 60 + self.minutes
    }
}

impl fmt::Display for FlightDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

/// Parse a 24-hour `HH:MM` clock reading.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

fn offset_delta(offset_hours: f64) -> Option<TimeDelta> {
    if !offset_hours.is_finite() {
        return None;
    }
    TimeDelta::try_milliseconds((offset_hours * MILLIS_PER_HOUR).round() as i64)
}

/// Clock reading on the reference date, shifted back to UTC by its offset.
fn utc_instant(clock: &str, offset_hours: f64) -> Option<NaiveDateTime> {
    let reference = NaiveDate::from_ymd_opt(2000, 1, 1)?;
    reference
        .and_time(parse_clock(clock)?)
        .checked_sub_signed(offset_delta(offset_hours)?)
}

/// Elapsed time between a departure and an arrival given as local clock
/// readings with their UTC offsets in hours (fractions allowed).
///
/// Returns `None` while either time is missing or malformed. An arrival
/// that normalizes to before the departure is treated as the next day.
/// Only one day boundary is assumed, so legs of 24h or longer
/// under-report. An arrival already after the departure is never wrapped,
/// which can exceed 24h between extreme offsets.
pub fn compute_duration(
    departure_time: &str,
    arrival_time: &str,
    departure_offset_hours: f64,
    arrival_offset_hours: f64,
) -> Option<FlightDuration> {
    let departure = utc_instant(departure_time, departure_offset_hours)?;
    let mut arrival = utc_instant(arrival_time, arrival_offset_hours)?;

    if arrival < departure {
        arrival = arrival.checked_add_signed(TimeDelta::days(1))?;
    }

    let mut elapsed_ms = (arrival - departure).num_milliseconds();
    // Opposite extreme offsets can leave the arrival behind after one rollover.
    if elapsed_ms < 0 {
        elapsed_ms = elapsed_ms.rem_euclid(TimeDelta::days(1).num_milliseconds());
    }

    let total_minutes = u32::try_from(elapsed_ms / 60_000).ok()?;
    Some(FlightDuration {
        hours: total_minutes / 60,
        minutes: total_minutes % 60,
    })
}
