//! Wire timestamp format shared by every endpoint
//!
//! The API always sends UTC timestamps with exactly three fractional digits,
//! e.g. `2024-04-06T10:00:00.000Z`. Anything else is rejected so that a
//! malformed record fails the whole response.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serializer};

use crate::TechTrackerError;

/// chrono pattern for the wire format
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

static TIMESTAMP_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z$").expect("static regex is valid")
});

/// Parse a wire timestamp into a UTC instant
pub fn parse_timestamp(value: &str) -> crate::Result<DateTime<Utc>> {
    // chrono treats the fraction as optional, so check the exact shape first
    if !TIMESTAMP_SHAPE.is_match(value) {
        return Err(TechTrackerError::Timestamp(format!(
            "'{}' does not match YYYY-MM-DDTHH:mm:ss.sssZ",
            value
        )));
    }

    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| TechTrackerError::Timestamp(format!("'{}': {}", value, e)))
}

/// Format a UTC instant in the wire format
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// serde adapter, used as `#[serde(with = "crate::timestamp")]`
pub fn serialize<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(time))
}

/// serde adapter, used as `#[serde(with = "crate::timestamp")]`
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}
