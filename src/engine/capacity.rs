//! Capacity reporting.
//!
//! Summarizes open capacity over a date range from generated slots.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Open slots | Slots still bookable, per date and in total |
//! | Gross slots | Slots the hours would offer with no bookings |
//! | Open rate | Open slots / gross slots |
//! | Active bookings | Non-cancelled bookings dated within the range |
//! | Booked minutes | Sum of their session lengths |

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::SchedulingEngine;
use crate::models::Booking;

/// Open-capacity summary for `[start_date, end_date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityReport {
    /// First date (inclusive).
    pub start_date: NaiveDate,
    /// Last date (exclusive).
    pub end_date: NaiveDate,
    /// Session length used for slot generation (minutes).
    pub session_minutes: u32,
    /// Open slots per date. Dates with no open slots are omitted.
    pub open_slots_by_date: BTreeMap<NaiveDate, usize>,
    /// Total open slots.
    pub total_open_slots: usize,
    /// Slots offered with no bookings at all.
    pub gross_slots: usize,
    /// Fraction of gross slots still open (0.0..1.0).
    pub open_rate: f64,
    /// Active bookings dated within the range.
    pub active_bookings: usize,
    /// Total minutes held by those bookings.
    pub booked_minutes: u64,
}

impl CapacityReport {
    /// Computes the report.
    ///
    /// # Arguments
    /// * `engine` - Engine supplying hours, blocks, and the booked-slot rule.
    /// * `bookings` - Existing bookings.
    /// * `now` - Slots at or before this instant are not counted.
    pub fn calculate(
        engine: &SchedulingEngine,
        start_date: NaiveDate,
        end_date: NaiveDate,
        session_minutes: u32,
        bookings: &[Booking],
        now: NaiveDateTime,
    ) -> Self {
        let mut open_slots_by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for slot in engine.slots_in_range(start_date, end_date, session_minutes, bookings, now) {
            *open_slots_by_date.entry(slot.date).or_insert(0) += 1;
        }
        let total_open_slots: usize = open_slots_by_date.values().sum();

        let gross_slots = engine
            .slots_in_range(start_date, end_date, session_minutes, &[], now)
            .count();

        let open_rate = if gross_slots == 0 {
            0.0
        } else {
            total_open_slots as f64 / gross_slots as f64
        };

        let in_range: Vec<&Booking> = bookings
            .iter()
            .filter(|b| b.is_active())
            .filter(|b| b.date() >= start_date && b.date() < end_date)
            .collect();

        Self {
            start_date,
            end_date,
            session_minutes,
            open_slots_by_date,
            total_open_slots,
            gross_slots,
            open_rate,
            active_bookings: in_range.len(),
            booked_minutes: in_range.iter().map(|b| u64::from(b.duration_minutes)).sum(),
        }
    }

    /// Date with the most open slots; the earliest wins ties.
    pub fn most_open_date(&self) -> Option<NaiveDate> {
        self.open_slots_by_date
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(date, _)| *date)
    }
}

impl SchedulingEngine {
    /// Open-capacity report for a date range.
    pub fn capacity_report(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        session_minutes: u32,
        bookings: &[Booking],
        now: NaiveDateTime,
    ) -> CapacityReport {
        CapacityReport::calculate(self, start_date, end_date, session_minutes, bookings, now)
    }
}
