//! String forms used by the storage schema: `HH:MM` times and `YYYY-MM-DD` dates.

use crate::error::CalendarError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Parse `HH:MM`. Database time columns come back as `HH:MM:SS`, so that is accepted too.
pub fn parse_time(input: &str) -> Result<NaiveTime, CalendarError> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| CalendarError::InvalidTime(input.to_string()))
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub fn parse_date(input: &str) -> Result<NaiveDate, CalendarError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| CalendarError::InvalidDate(input.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a local wall-clock instant such as `2025-12-20T14:00` (seconds optional).
pub fn parse_datetime(input: &str) -> Result<NaiveDateTime, CalendarError> {
    let trimmed = input.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M"))
        .map_err(|_| CalendarError::InvalidDateTime(input.to_string()))
}

/// Empty cells mean "unset".
pub fn parse_optional_time(input: &str) -> Result<Option<NaiveTime>, CalendarError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_time(input).map(Some)
}

pub fn parse_optional_date(input: &str) -> Result<Option<NaiveDate>, CalendarError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_date(input).map(Some)
}

/// Serde adapter for `NaiveTime` fields stored as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(D::Error::custom)
    }
}

/// Serde adapter for nullable `HH:MM` fields.
pub mod hhmm_option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => serializer.serialize_str(&super::format_time(*time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            Some(raw) => super::parse_optional_time(&raw).map_err(D::Error::custom),
            None => Ok(None),
        }
    }
}
