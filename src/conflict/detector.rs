//! Booking overlap detection.
//!
//! Two sessions `[s1, e1)` and `[s2, e2)` conflict iff `s1 < e2 && s2 < e1`.
//! Touching endpoints (one ends exactly when the other starts) do not
//! conflict. Only bookings on the candidate's calendar date are compared,
//! as minutes since midnight, so comparisons never cross midnight.

use chrono::NaiveDateTime;

use crate::models::{Booking, TimeRange};

/// Finds existing bookings that overlap a candidate appointment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector;

impl ConflictDetector {
    /// Creates a detector.
    pub fn new() -> Self {
        Self
    }

    /// Bookings overlapping a session at `candidate_start` lasting
    /// `duration_minutes`, in input order.
    ///
    /// `exclude_booking_id` skips the booking being edited so it does not
    /// conflict with itself. Cancelled bookings never conflict.
    ///
    /// # Example
    ///
    /// ```
    /// use u_booking::conflict::ConflictDetector;
    /// use u_booking::models::{time::parse_start, Booking};
    ///
    /// let bookings = vec![Booking::new("b1", parse_start("2025-03-10", "09:30").unwrap(), 60)];
    /// let detector = ConflictDetector::new();
    ///
    /// let at_nine = parse_start("2025-03-10", "09:00").unwrap();
    /// assert_eq!(detector.find_conflicts(at_nine, 60, &bookings, None).len(), 1);
    ///
    /// let at_half_ten = parse_start("2025-03-10", "10:30").unwrap();
    /// assert!(detector.find_conflicts(at_half_ten, 60, &bookings, None).is_empty());
    /// ```
    pub fn find_conflicts<'b>(
        &self,
        candidate_start: NaiveDateTime,
        duration_minutes: u32,
        bookings: &'b [Booking],
        exclude_booking_id: Option<&str>,
    ) -> Vec<&'b Booking> {
        let date = candidate_start.date();
        let candidate = TimeRange::starting_at(candidate_start.time(), duration_minutes);

        bookings
            .iter()
            .filter(|b| b.is_active())
            .filter(|b| b.date() == date)
            .filter(|b| exclude_booking_id != Some(b.id.as_str()))
            .filter(|b| candidate.overlaps(&b.time_range()))
            .collect()
    }

    /// Whether any booking conflicts with the candidate.
    pub fn has_conflict(
        &self,
        candidate_start: NaiveDateTime,
        duration_minutes: u32,
        bookings: &[Booking],
        exclude_booking_id: Option<&str>,
    ) -> bool {
        !self
            .find_conflicts(candidate_start, duration_minutes, bookings, exclude_booking_id)
            .is_empty()
    }
}
