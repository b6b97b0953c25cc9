//! Wall-clock time model.
//!
//! All scheduling happens in the practitioner's local wall-clock time.
//! Dates are `chrono::NaiveDate`, times of day are `chrono::NaiveTime`,
//! and appointment starts are `chrono::NaiveDateTime`. Text is converted
//! only here, at the boundary: ISO `YYYY-MM-DD` for dates and `HH:MM`
//! for times.
//!
//! Intervals within one day are compared as minutes since midnight
//! ([`TimeRange`]), so an interval never wraps into the next day.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Minutes in one day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Parses an ISO `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|source| {
        ScheduleError::InvalidDate {
            value: value.to_string(),
            source,
        }
    })
}

/// Parses an `HH:MM` wall-clock time.
pub fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|source| {
        ScheduleError::InvalidTime {
            value: value.to_string(),
            source,
        }
    })
}

/// Combines an ISO date and an `HH:MM` time into an appointment start.
pub fn parse_start(date: &str, time: &str) -> Result<NaiveDateTime> {
    Ok(parse_date(date)?.and_time(parse_time(time)?))
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats a time as `HH:MM`.
pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Minutes since midnight for a time of day.
#[inline]
pub fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

/// Time of day for a minute offset, `None` outside `[0, 1440)`.
pub fn time_from_minutes(minutes: i64) -> Option<NaiveTime> {
    if !(0..MINUTES_PER_DAY).contains(&minutes) {
        return None;
    }
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)
}

/// A same-day interval [start, end) in minutes since midnight.
///
/// Half-open interval: includes start, excludes end. `end` may exceed
/// [`MINUTES_PER_DAY`] when a session runs past midnight; it is still
/// compared against the day it started on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeRange {
    /// Interval start (minutes, inclusive).
    pub start_min: i64,
    /// Interval end (minutes, exclusive).
    pub end_min: i64,
}

impl TimeRange {
    /// Creates a new range.
    pub fn new(start_min: i64, end_min: i64) -> Self {
        Self { start_min, end_min }
    }

    /// Range covering a session starting at `start` for `duration_minutes`.
    pub fn starting_at(start: NaiveTime, duration_minutes: u32) -> Self {
        let start_min = minute_of_day(start);
        Self::new(start_min, start_min + i64::from(duration_minutes))
    }

    /// Range between two times of day.
    pub fn between(start: NaiveTime, end: NaiveTime) -> Self {
        Self::new(minute_of_day(start), minute_of_day(end))
    }

    /// Length of this range (minutes).
    #[inline]
    pub fn duration_min(&self) -> i64 {
        self.end_min - self.start_min
    }

    /// Whether a minute offset falls within this range.
    #[inline]
    pub fn contains(&self, minute: i64) -> bool {
        minute >= self.start_min && minute < self.end_min
    }

    /// Whether `other` lies entirely within this range.
    pub fn covers(&self, other: &Self) -> bool {
        other.start_min >= self.start_min && other.end_min <= self.end_min
    }

    /// Whether two ranges overlap. Touching endpoints do not.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_min < other.end_min && other.start_min < self.end_min
    }
}

/// Serde adapter for `HH:MM` time fields.
///
/// ```
/// use chrono::NaiveTime;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Opening {
///     #[serde(with = "u_booking::models::hhmm")]
///     at: NaiveTime,
/// }
///
/// let opening: Opening = serde_json::from_str(r#"{"at":"09:30"}"#).unwrap();
/// assert_eq!(opening.at, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
/// ```
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(serde::de::Error::custom)
    }
}
