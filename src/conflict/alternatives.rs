//! Alternative slot search.
//!
//! # Algorithm
//!
//! Scans whole-hour offsets around the conflicting start in a fixed order:
//! `-N, .., -1, +1, .., +N` (N = 3 by default). Each shifted start is
//! checked with the [`ConflictDetector`]; conflict-free starts are
//! accepted until `max_results` (4 by default) are collected or the
//! offsets run out. Offset 0 is never tried, so the requested start is
//! never proposed. Shifts that leave the candidate's date are skipped, so
//! the window is capped at 23 hours each way.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::detector::ConflictDetector;
use crate::availability::{BusinessHoursPolicy, SessionFit};
use crate::models::{Booking, SuggestedSlot};

/// No whole-hour shift larger than this can stay on the same date.
const MAX_SAME_DAY_OFFSET: u32 = 23;

/// Proposes conflict-free starts near a conflicting one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlternativeSlotFinder {
    /// Maximum number of suggestions.
    pub max_results: usize,
    /// Largest hour offset tried in each direction. Values above 23 act
    /// as 23.
    pub max_hour_offset: u32,
}

impl Default for AlternativeSlotFinder {
    fn default() -> Self {
        Self {
            max_results: 4,
            max_hour_offset: 3,
        }
    }
}

impl AlternativeSlotFinder {
    /// Creates a finder with the default window (±3 hours, 4 results).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of suggestions.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Sets the hour window searched in each direction.
    pub fn with_max_hour_offset(mut self, hours: u32) -> Self {
        self.max_hour_offset = hours;
        self
    }

    /// Hour offsets in scan order.
    pub fn offsets(&self) -> impl Iterator<Item = i64> {
        let max = i64::from(self.max_hour_offset.min(MAX_SAME_DAY_OFFSET));
        (-max..0).chain(1..=max)
    }

    /// Conflict-free alternatives, ignoring business hours.
    ///
    /// ```
    /// use u_booking::conflict::AlternativeSlotFinder;
    /// use u_booking::models::{time::parse_start, Booking};
    ///
    /// let bookings = vec![Booking::new("b1", parse_start("2025-03-10", "14:30").unwrap(), 60)];
    /// let wanted = parse_start("2025-03-10", "14:00").unwrap();
    ///
    /// let found = AlternativeSlotFinder::new().suggest(wanted, 75, &bookings);
    /// let hours: Vec<String> = found.iter().map(|s| s.start.format("%H:%M").to_string()).collect();
    /// assert_eq!(hours, vec!["11:00", "12:00", "13:00", "16:00"]);
    /// ```
    pub fn suggest(
        &self,
        candidate_start: NaiveDateTime,
        duration_minutes: u32,
        bookings: &[Booking],
    ) -> Vec<SuggestedSlot> {
        self.search(candidate_start, duration_minutes, bookings, None, None)
    }

    /// Conflict-free alternatives that also fit inside the date's
    /// business hours.
    pub fn suggest_within_hours(
        &self,
        candidate_start: NaiveDateTime,
        duration_minutes: u32,
        bookings: &[Booking],
        policy: &BusinessHoursPolicy,
    ) -> Vec<SuggestedSlot> {
        self.search(
            candidate_start,
            duration_minutes,
            bookings,
            None,
            Some(policy as &dyn SessionFit),
        )
    }

    /// Full search.
    ///
    /// `exclude_booking_id` is forwarded to conflict detection so an edited
    /// booking does not block its own alternatives. With a `fit` check,
    /// starts whose session it rejects are dropped.
    pub fn search(
        &self,
        candidate_start: NaiveDateTime,
        duration_minutes: u32,
        bookings: &[Booking],
        exclude_booking_id: Option<&str>,
        fit: Option<&dyn SessionFit>,
    ) -> Vec<SuggestedSlot> {
        let session = Duration::minutes(i64::from(duration_minutes));
        let detector = ConflictDetector::new();
        let date = candidate_start.date();
        let mut found = Vec::new();

        for offset in self.offsets() {
            if found.len() >= self.max_results {
                break;
            }
            let Some(start) = candidate_start.checked_add_signed(Duration::hours(offset)) else {
                continue;
            };
            if start.date() != date || start.checked_add_signed(session).is_none() {
                continue;
            }
            if let Some(fit) = fit {
                if !fit.fits(start, duration_minutes) {
                    trace!(%start, "outside open time");
                    continue;
                }
            }
            if detector.has_conflict(start, duration_minutes, bookings, exclude_booking_id) {
                continue;
            }
            found.push(SuggestedSlot::new(start, duration_minutes));
        }

        found
    }
}
