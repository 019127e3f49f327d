//! Lenient field decoding for documents written by older versions or
//! imported from exports, where optional values may be empty strings
//! or free text.

use crate::flight::duration::FlightDuration;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// `""` and `null` decode as `None`; anything else must be `YYYY-MM-DD`.
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DurationField {
    Structured(FlightDuration),
    Other(serde::de::IgnoredAny),
}

/// A structured `{hours, minutes}` duration, or `None` for text and other
/// shapes (recomputed from the leg's times on import).
pub fn lenient_duration<'de, D>(deserializer: D) -> Result<Option<FlightDuration>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<DurationField>::deserialize(deserializer)? {
        Some(DurationField::Structured(duration)) => Ok(Some(duration)),
        _ => Ok(None),
    }
}
