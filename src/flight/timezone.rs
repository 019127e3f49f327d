//! Timezone labels of the form `UTC+5.5 (India, Sri Lanka)`.
//!
//! Flight legs store the label the user picked; the numeric offset is
//! recovered from the `UTC<sign><hours>` prefix whenever a duration is
//! computed.

use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_TIMEZONE: &str = "UTC+8 (Taiwan)";

static OFFSET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"UTC([+-]?\d+(?:\.\d+)?)").expect("valid offset pattern"));

/// Region annotations shown next to whole-hour offsets.
const REGIONS: &[(i32, &str)] = &[
    (-11, "American Samoa"),
    (-10, "Hawaii"),
    (-9, "Alaska"),
    (-8, "US West Coast, Vancouver"),
    (-7, "US Mountain, Mexico"),
    (-6, "US Central, Mexico City"),
    (-5, "US East Coast, Toronto"),
    (-4, "Canada, South America"),
    (-3, "Brazil, Argentina"),
    (-2, "Mid-Atlantic"),
    (-1, "Azores"),
    (0, "UK, Portugal"),
    (1, "France, Germany"),
    (2, "Finland, Greece"),
    (3, "Russia, Turkey"),
    (4, "United Arab Emirates"),
    (5, "Pakistan"),
    (6, "Bangladesh"),
    (7, "Thailand, Vietnam"),
    (8, "Taiwan"),
    (9, "Japan, Korea"),
];

/// Offset in hours encoded in a label, if it carries one.
pub fn try_parse_timezone_offset(label: &str) -> Option<f64> {
    let captures = OFFSET_PATTERN.captures(label)?;
    captures[1].parse().ok()
}

/// Offset in hours encoded in a label. Empty or unrecognized labels count as UTC.
pub fn parse_timezone_offset(label: &str) -> f64 {
    try_parse_timezone_offset(label).unwrap_or(0.0)
}

fn label_for(offset: i32) -> String {
    let sign = if offset >= 0 { "+" } else { "" };
    match REGIONS.iter().find(|(o, _)| *o == offset) {
        Some((_, region)) => format!("UTC{}{} ({})", sign, offset, region),
        None => format!("UTC{}{}", sign, offset),
    }
}

/// Every selectable label from UTC-12 to UTC+14, with UTC+5.5 after UTC+5.
pub fn timezone_options() -> Vec<String> {
    let mut options = Vec::with_capacity(28);
    for offset in -12..=14 {
        options.push(label_for(offset));
        if offset == 5 {
            options.push("UTC+5.5 (India, Sri Lanka)".to_string());
        }
    }
    options
}
