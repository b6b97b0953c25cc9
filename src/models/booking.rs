//! Booking model.
//!
//! A booking is a client appointment already held in the caller's store.
//! The engine only reads bookings; it never creates, edits, or deletes them.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::time::TimeRange;

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    /// Upcoming appointment.
    #[default]
    Scheduled,
    /// Session took place.
    Completed,
    /// Cancelled by client or practitioner.
    Cancelled,
    /// Client did not attend.
    NoShow,
    /// Moved to a new time.
    Rescheduled,
}

impl BookingStatus {
    /// Whether a booking with this status occupies its time.
    ///
    /// Only cancelled bookings release their time. A no-show or completed
    /// session still held the practitioner's calendar.
    pub fn blocks_time(self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

/// A client appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: String,
    /// Local wall-clock start.
    pub scheduled_start: NaiveDateTime,
    /// Session length (minutes, > 0).
    pub duration_minutes: u32,
    /// Client display name.
    #[serde(default)]
    pub client_name: String,
    /// Lifecycle status.
    #[serde(default)]
    pub status: BookingStatus,
}

impl Booking {
    /// Creates a scheduled booking.
    pub fn new(id: impl Into<String>, scheduled_start: NaiveDateTime, duration_minutes: u32) -> Self {
        Self {
            id: id.into(),
            scheduled_start,
            duration_minutes,
            client_name: String::new(),
            status: BookingStatus::Scheduled,
        }
    }

    /// Sets the client name.
    pub fn with_client(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = client_name.into();
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: BookingStatus) -> Self {
        self.status = status;
        self
    }

    /// Calendar date of the appointment.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.scheduled_start.date()
    }

    /// Wall-clock end of the appointment.
    pub fn scheduled_end(&self) -> NaiveDateTime {
        self.scheduled_start + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Same-day interval covered by this booking.
    pub fn time_range(&self) -> TimeRange {
        TimeRange::starting_at(self.scheduled_start.time(), self.duration_minutes)
    }

    /// Whether this booking holds its time slot.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status.blocks_time()
    }
}
