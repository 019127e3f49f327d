use crate::error::{Error, Result};
use crate::flight::models::{FlightLeg, sort_flights};
use crate::store::Document;
use crate::utils::ids::generate_id;
use crate::utils::serde_compat::optional_date;
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default, deserialize_with = "optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub flights: Vec<FlightLeg>,
}

impl Trip {
    /// The end date may not precede the start date.
    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(Error::InvalidDateRange { start, end });
            }
        }
        Ok(())
    }

    /// Number of calendar days covered, both ends included.
    pub fn day_count(&self) -> Option<i64> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end >= start => Some((end - start).num_days() + 1),
            _ => None,
        }
    }

    pub fn flight(&self, flight_id: &str) -> Option<&FlightLeg> {
        self.flights.iter().find(|f| f.id == flight_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Every trip, persisted as one JSON array.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct TripBook {
    trips: Vec<Trip>,
}

impl Document for TripBook {
    const FILE_NAME: &'static str = "trips.json";
}

impl TripBook {
    pub fn new(trips: Vec<Trip>) -> Self {
        Self { trips }
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&Trip> {
        self.trips
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::TripNotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Trip> {
        self.trips
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::TripNotFound(id.to_string()))
    }

    fn new_trip_id(&self) -> String {
        generate_id(self.trips.iter().map(|t| t.id.as_str()))
    }

    /// Add a trip under a fresh id and return that id.
    pub fn add(&mut self, mut trip: Trip) -> Result<String> {
        trip.validate()?;
        trip.id = self.new_trip_id();
        prepare_flights(&mut trip.flights);
        let id = trip.id.clone();
        self.trips.push(trip);
        Ok(id)
    }

    /// Replace the trip with the same id.
    pub fn update(&mut self, mut trip: Trip) -> Result<()> {
        trip.validate()?;
        prepare_flights(&mut trip.flights);
        let existing = self.get_mut(&trip.id)?;
        *existing = trip;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<Trip> {
        let index = self
            .trips
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::TripNotFound(id.to_string()))?;
        Ok(self.trips.remove(index))
    }

    /// Trips by start date. Trips without one are listed last either way.
    pub fn sorted(&self, order: SortOrder) -> Vec<&Trip> {
        let mut trips: Vec<&Trip> = self.trips.iter().collect();
        trips.sort_by(|a, b| match (a.start_date, b.start_date) {
            (Some(x), Some(y)) => match order {
                SortOrder::Asc => x.cmp(&y),
                SortOrder::Desc => y.cmp(&x),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        trips
    }

    /// Add a flight leg to a trip, computing its duration if none was given.
    pub fn add_flight(&mut self, trip_id: &str, mut flight: FlightLeg) -> Result<String> {
        let trip = self.get_mut(trip_id)?;
        flight.id = generate_id(trip.flights.iter().map(|f| f.id.as_str()));
        flight.ensure_duration();
        let id = flight.id.clone();
        trip.flights.push(flight);
        sort_flights(&mut trip.flights);
        Ok(id)
    }

    /// Replace a flight leg; its duration follows the edited times.
    pub fn update_flight(&mut self, trip_id: &str, mut flight: FlightLeg) -> Result<()> {
        let trip = self.get_mut(trip_id)?;
        let existing = trip
            .flights
            .iter_mut()
            .find(|f| f.id == flight.id)
            .ok_or_else(|| Error::FlightNotFound {
                trip_id: trip_id.to_string(),
                flight_id: flight.id.clone(),
            })?;
        flight.recompute_duration();
        *existing = flight;
        sort_flights(&mut trip.flights);
        Ok(())
    }

    pub fn remove_flight(&mut self, trip_id: &str, flight_id: &str) -> Result<FlightLeg> {
        let trip = self.get_mut(trip_id)?;
        let index = trip
            .flights
            .iter()
            .position(|f| f.id == flight_id)
            .ok_or_else(|| Error::FlightNotFound {
                trip_id: trip_id.to_string(),
                flight_id: flight_id.to_string(),
            })?;
        Ok(trip.flights.remove(index))
    }

    /// Fill in missing flight durations and restore flight order, e.g. after import.
    pub fn normalize(&mut self) {
        for trip in &mut self.trips {
            prepare_flights(&mut trip.flights);
        }
    }
}

fn prepare_flights(flights: &mut [FlightLeg]) {
    for flight in flights.iter_mut() {
        flight.ensure_duration();
    }
    sort_flights(flights);
}
