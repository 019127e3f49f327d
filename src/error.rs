//! Domain errors for trip planning.
//!
//! Pure calculations never fail: unparseable input clears the derived
//! value instead. These errors cover record-keeping rules and the rate
//! service boundary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("trip not found: {0}")]
    TripNotFound(String),

    #[error("flight {flight_id} not found in trip {trip_id}")]
    FlightNotFound { trip_id: String, flight_id: String },

    #[error("expense {expense_id} not found in trip {trip_id}")]
    ExpenseNotFound { trip_id: String, expense_id: String },

    #[error("end date {end} is before start date {start}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("no trip selected. Run 'trip trip select <ID>' or pass --trip")]
    NoTripSelected,

    #[error("expense description must not be empty")]
    MissingDescription,

    #[error("conversion is incomplete: enter a valid amount")]
    IncompleteConversion,

    #[error("no exchange rate available for {0}")]
    NoActiveRate(String),

    #[error("unknown currency pair '{0}'")]
    UnknownCurrencyPair(String),

    #[error("invalid timezone label '{0}'")]
    InvalidTimezone(String),

    #[error("rate service returned status {0}")]
    RateService(u16),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for errors caused by what was typed on the command line rather
    /// than by stored data or the rate service. The CLI exits with 2 for these.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingDescription
                | Self::IncompleteConversion
                | Self::NoActiveRate(_)
                | Self::InvalidDateRange { .. }
                | Self::InvalidTimezone(_)
                | Self::UnknownCurrencyPair(_)
        )
    }
}
