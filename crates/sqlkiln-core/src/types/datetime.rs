//! Date and time parsing shared by the temporal type descriptors.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

use crate::value::SqlValue;

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%z", "%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%dT%H:%M:%S%z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a Unix timestamp or a textual date/time.
///
/// Text without an offset is taken as UTC. Returns `None` for values that
/// are neither.
#[must_use]
pub fn parse_datetime(value: &SqlValue) -> Option<DateTime<FixedOffset>> {
    match value {
        SqlValue::Int(secs) => DateTime::from_timestamp(*secs, 0).map(|dt| dt.fixed_offset()),
        SqlValue::Text(text) => parse_text(text.trim()),
        _ => None,
    }
}

fn parse_text(text: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc().fixed_offset());
    }
    let time = NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .ok()?;
    NaiveDate::from_ymd_opt(1970, 1, 1).map(|epoch| epoch.and_time(time).and_utc().fixed_offset())
}

/// Formats a temporal value for storage with a `chrono` format string.
///
/// Values that cannot be parsed pass through untouched.
#[must_use]
pub fn format_datetime(value: SqlValue, format: &str) -> SqlValue {
    match parse_datetime(&value) {
        Some(dt) => SqlValue::Text(dt.format(format).to_string()),
        None => value,
    }
}
