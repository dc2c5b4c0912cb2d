//! Normalization of observation timestamps onto a single UTC grid.
//!
//! Upstream tables deliver timestamps either as text (Open-Meteo emits
//! `2024-01-01T00:00`, CSV exports may carry seconds or an offset) or as
//! native chrono instants. Everything is reduced to a `NaiveDateTime` in UTC
//! so that daily buckets are midnight-to-midnight UTC.

use crate::error::{ObservationError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Naive layouts tried in order after RFC 3339.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp string into a UTC instant.
///
/// Offset-carrying RFC 3339 strings are converted to UTC; naive strings are
/// taken to already be UTC. A bare date maps to its midnight.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(s) {
        return Ok(with_offset.naive_utc());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, aq_utils::dates::DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(ObservationError::Timestamp(raw.to_string()))
}

/// Anything that can be normalized to a UTC instant.
pub trait IntoInstant {
    fn into_instant(self) -> Result<NaiveDateTime>;
}

impl IntoInstant for &str {
    fn into_instant(self) -> Result<NaiveDateTime> {
        parse_timestamp(self)
    }
}

impl IntoInstant for String {
    fn into_instant(self) -> Result<NaiveDateTime> {
        parse_timestamp(&self)
    }
}

impl IntoInstant for &String {
    fn into_instant(self) -> Result<NaiveDateTime> {
        parse_timestamp(self)
    }
}

impl IntoInstant for NaiveDateTime {
    fn into_instant(self) -> Result<NaiveDateTime> {
        Ok(self)
    }
}

impl IntoInstant for NaiveDate {
    fn into_instant(self) -> Result<NaiveDateTime> {
        Ok(self.and_time(NaiveTime::MIN))
    }
}

impl<Tz: TimeZone> IntoInstant for DateTime<Tz> {
    fn into_instant(self) -> Result<NaiveDateTime> {
        Ok(self.naive_utc())
    }
}
