//! Slot output models.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::time::hhmm;

/// A generated bookable slot.
///
/// Slots are reported capacity, not reservations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    /// Slot date.
    pub date: NaiveDate,
    /// Slot start.
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// Slot end (start + session length). May wrap past midnight for
    /// late sessions; `date` stays the start date.
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl Slot {
    /// Creates a slot for a session of `duration_minutes`.
    pub fn new(date: NaiveDate, start: NaiveTime, duration_minutes: u32) -> Self {
        let (end, _) = start.overflowing_add_signed(Duration::minutes(i64::from(duration_minutes)));
        Self { date, start, end }
    }

    /// Date and start combined.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start)
    }
}

/// An alternative appointment window proposed after a conflict.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestedSlot {
    /// Proposed start.
    pub start: NaiveDateTime,
    /// Proposed end.
    pub end: NaiveDateTime,
}

impl SuggestedSlot {
    /// Creates a suggestion for a session of `duration_minutes`.
    pub fn new(start: NaiveDateTime, duration_minutes: u32) -> Self {
        Self {
            start,
            end: start + Duration::minutes(i64::from(duration_minutes)),
        }
    }
}
