//! Scheduling engine facade.
//!
//! # Flow
//!
//! 1. Adjust the requested duration for the selected add-ons.
//! 2. Check the adjusted session against existing bookings.
//! 3. If it conflicts, search nearby hours for alternatives.
//!
//! The engine never mutates its inputs. Whether a conflict blocks the
//! booking is the caller's decision.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::availability::{
    BookedSlotRule, BusinessHoursPolicy, ResolvedHours, SessionFit, SlotGenerator, Slots,
};
use crate::config::{AlternativeSettings, EngineConfig};
use crate::conflict::ConflictDetector;
use crate::duration::{additional_price_cents, adjusted_duration};
use crate::error::{Result, ScheduleError};
use crate::models::time::parse_start;
use crate::models::{AddOnCatalog, AddOnSelection, AvailabilityBlock, Booking, SuggestedSlot};

/// A client's booking intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Requested start.
    pub start: NaiveDateTime,
    /// Session length before add-ons (minutes, > 0).
    pub base_duration_minutes: u32,
    /// Selected add-ons.
    #[serde(default)]
    pub add_ons: AddOnSelection,
    /// Booking being edited, excluded from conflict checks.
    #[serde(default)]
    pub exclude_booking_id: Option<String>,
}

impl BookingRequest {
    /// Creates a request. Fails on a zero base duration.
    pub fn new(start: NaiveDateTime, base_duration_minutes: u32) -> Result<Self> {
        if base_duration_minutes == 0 {
            return Err(ScheduleError::InvalidDuration(base_duration_minutes));
        }
        Ok(Self {
            start,
            base_duration_minutes,
            add_ons: AddOnSelection::new(),
            exclude_booking_id: None,
        })
    }

    /// Creates a request from an ISO date and an `HH:MM` time.
    pub fn parse(date: &str, time: &str, base_duration_minutes: u32) -> Result<Self> {
        Self::new(parse_start(date, time)?, base_duration_minutes)
    }

    /// Selects an add-on.
    pub fn with_add_on(mut self, id: impl Into<String>) -> Self {
        self.add_ons.select(id);
        self
    }

    /// Marks the request as an edit of an existing booking.
    pub fn editing(mut self, booking_id: impl Into<String>) -> Self {
        self.exclude_booking_id = Some(booking_id.into());
        self
    }
}

/// Outcome of evaluating a [`BookingRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingEvaluation {
    /// Requested start.
    pub start: NaiveDateTime,
    /// Session length after add-ons.
    pub duration_minutes: u32,
    /// Add-on surcharge, in cents.
    pub add_on_price_cents: u32,
    /// Whether the session fits inside the date's open time: business
    /// hours plus admin open blocks, minus admin closed blocks.
    pub within_business_hours: bool,
    /// Overlapping bookings.
    pub conflicts: Vec<Booking>,
    /// Suggestions; only searched when there are conflicts.
    pub alternatives: Vec<SuggestedSlot>,
}

impl BookingEvaluation {
    /// Whether the request is free of conflicts.
    pub fn is_conflict_free(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Availability engine for one practitioner.
///
/// Holds the practice configuration; bookings and `now` are passed to
/// each call.
///
/// # Example
///
/// ```
/// use u_booking::engine::{BookingRequest, SchedulingEngine};
/// use u_booking::models::{time::parse_start, Booking};
///
/// let engine = SchedulingEngine::default();
/// let bookings = vec![Booking::new("b1", parse_start("2025-03-10", "14:30").unwrap(), 60)];
///
/// let request = BookingRequest::parse("2025-03-10", "14:00", 60)
///     .unwrap()
///     .with_add_on("reflexology");
/// let evaluation = engine.evaluate(&request, &bookings);
///
/// assert_eq!(evaluation.duration_minutes, 75);
/// assert_eq!(evaluation.conflicts.len(), 1);
/// // 11:00, 12:00, 13:00; 16:00 would run past closing
/// assert_eq!(evaluation.alternatives.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SchedulingEngine {
    policy: BusinessHoursPolicy,
    blocks: Vec<AvailabilityBlock>,
    catalog: AddOnCatalog,
    slot_rule: BookedSlotRule,
    alternatives: AlternativeSettings,
}

impl SchedulingEngine {
    /// Builds an engine from configuration.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            policy: config.policy(),
            blocks: config.blocks.clone(),
            catalog: config.add_ons.clone(),
            slot_rule: config.slots.booked_slot_rule,
            alternatives: config.alternatives,
        }
    }

    /// Replaces the business-hours policy.
    pub fn with_policy(mut self, policy: BusinessHoursPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the add-on catalog.
    pub fn with_catalog(mut self, catalog: AddOnCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replaces the admin availability blocks.
    pub fn with_blocks(mut self, blocks: Vec<AvailabilityBlock>) -> Self {
        self.blocks = blocks;
        self
    }

    /// Sets the booked-slot rule used by slot generation.
    pub fn with_slot_rule(mut self, rule: BookedSlotRule) -> Self {
        self.slot_rule = rule;
        self
    }

    /// Business-hours policy.
    pub fn policy(&self) -> &BusinessHoursPolicy {
        &self.policy
    }

    /// Add-on catalog.
    pub fn catalog(&self) -> &AddOnCatalog {
        &self.catalog
    }

    /// Admin availability blocks.
    pub fn blocks(&self) -> &[AvailabilityBlock] {
        &self.blocks
    }

    /// Resolved opening hours for a date.
    pub fn hours_for(&self, date: NaiveDate) -> ResolvedHours {
        self.policy.hours_for(date)
    }

    /// Slot generator bound to this engine's policy, blocks, and rule.
    pub fn slot_generator(&self) -> SlotGenerator<'_> {
        SlotGenerator::new(&self.policy)
            .with_blocks(&self.blocks)
            .with_rule(self.slot_rule)
    }

    /// Lazily enumerates bookable slots for `[start_date, end_date)`.
    pub fn slots_in_range<'a>(
        &'a self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        session_minutes: u32,
        bookings: &'a [Booking],
        now: NaiveDateTime,
    ) -> Slots<'a> {
        self.slot_generator()
            .slots_in_range(start_date, end_date, session_minutes, bookings, now)
    }

    /// Session length after add-ons.
    pub fn adjusted_duration(&self, base_minutes: u32, selection: &AddOnSelection) -> u32 {
        adjusted_duration(base_minutes, selection, &self.catalog)
    }

    /// Whether a session at `start` lies entirely in open time, with admin
    /// blocks applied the same way slot generation applies them.
    pub fn fits_open_time(&self, start: NaiveDateTime, duration_minutes: u32) -> bool {
        self.slot_generator().fits_session(start, duration_minutes)
    }

    /// Bookings overlapping a candidate session.
    pub fn find_conflicts<'b>(
        &self,
        candidate_start: NaiveDateTime,
        duration_minutes: u32,
        bookings: &'b [Booking],
        exclude_booking_id: Option<&str>,
    ) -> Vec<&'b Booking> {
        ConflictDetector::new().find_conflicts(candidate_start, duration_minutes, bookings, exclude_booking_id)
    }

    /// Alternatives near a conflicting start, filtered through open time
    /// (see [`fits_open_time`](Self::fits_open_time)) unless disabled in
    /// configuration.
    pub fn suggest_alternatives(
        &self,
        candidate_start: NaiveDateTime,
        duration_minutes: u32,
        bookings: &[Booking],
        exclude_booking_id: Option<&str>,
    ) -> Vec<SuggestedSlot> {
        let generator = self.slot_generator();
        let fit = self
            .alternatives
            .respect_business_hours
            .then_some(&generator as &dyn SessionFit);
        self.alternatives
            .finder()
            .search(candidate_start, duration_minutes, bookings, exclude_booking_id, fit)
    }

    /// Runs the full booking check for a request.
    pub fn evaluate(&self, request: &BookingRequest, bookings: &[Booking]) -> BookingEvaluation {
        let duration = self.adjusted_duration(request.base_duration_minutes, &request.add_ons);
        let exclude = request.exclude_booking_id.as_deref();

        let conflicts: Vec<Booking> = self
            .find_conflicts(request.start, duration, bookings, exclude)
            .into_iter()
            .cloned()
            .collect();

        let alternatives = if conflicts.is_empty() {
            Vec::new()
        } else {
            self.suggest_alternatives(request.start, duration, bookings, exclude)
        };

        debug!(
            start = %request.start,
            duration,
            conflicts = conflicts.len(),
            alternatives = alternatives.len(),
            "evaluated booking request"
        );

        BookingEvaluation {
            start: request.start,
            duration_minutes: duration,
            add_on_price_cents: additional_price_cents(&request.add_ons, &self.catalog),
            within_business_hours: self.fits_open_time(request.start, duration),
            conflicts,
            alternatives,
        }
    }
}

impl Default for SchedulingEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time::{format_time, parse_date};
    use crate::models::{clock, BusinessHoursOverride};

    fn at(date: &str, time: &str) -> NaiveDateTime {
        parse_start(date, time).unwrap()
    }

    fn hours(found: &[SuggestedSlot]) -> Vec<String> {
        found.iter().map(|s| format_time(s.start.time())).collect()
    }

    #[test]
    fn test_request_rejects_zero_duration() {
        let err = BookingRequest::new(at("2025-03-10", "09:00"), 0).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidDuration(0)));
        assert!(BookingRequest::parse("2025-13-10", "09:00", 60).is_err());
    }

    #[test]
    fn test_conflict_free_request() {
        let engine = SchedulingEngine::default();
        let bookings = vec![Booking::new("b1", at("2025-03-10", "10:00"), 60)];
        let request = BookingRequest::parse("2025-03-10", "11:00", 60).unwrap();

        let eval = engine.evaluate(&request, &bookings);
        assert!(eval.is_conflict_free());
        assert!(eval.alternatives.is_empty());
        assert!(eval.within_business_hours);
        assert_eq!(eval.add_on_price_cents, 0);
    }

    #[test]
    fn test_reflexology_conflict_with_alternatives() {
        let engine = SchedulingEngine::default();
        let bookings = vec![Booking::new("b1", at("2025-03-10", "14:30"), 60)];
        let request = BookingRequest::parse("2025-03-10", "14:00", 60)
            .unwrap()
            .with_add_on("reflexology");

        let eval = engine.evaluate(&request, &bookings);
        assert_eq!(eval.duration_minutes, 75);
        assert_eq!(eval.add_on_price_cents, 2_000);
        assert_eq!(eval.conflicts[0].id, "b1");
        // 16:00-17:15 is conflict-free but runs past closing
        assert_eq!(hours(&eval.alternatives), vec!["11:00", "12:00", "13:00"]);
    }

    #[test]
    fn test_without_add_on_no_conflict() {
        // 14:00-15:00 ends exactly when the 15:00 booking starts
        let engine = SchedulingEngine::default();
        let bookings = vec![Booking::new("b1", at("2025-03-10", "15:00"), 60)];
        let plain = BookingRequest::parse("2025-03-10", "14:00", 60).unwrap();
        assert!(engine.evaluate(&plain, &bookings).is_conflict_free());

        let extended = plain.with_add_on("reflexology");
        assert!(!engine.evaluate(&extended, &bookings).is_conflict_free());
    }

    #[test]
    fn test_alternatives_respect_hours_by_default() {
        let engine = SchedulingEngine::default();
        let bookings = vec![Booking::new("b1", at("2025-03-10", "09:00"), 60)];
        let found = engine.suggest_alternatives(at("2025-03-10", "09:00"), 60, &bookings, None);
        assert_eq!(hours(&found), vec!["10:00", "11:00", "12:00"]);
    }

    #[test]
    fn test_alternatives_unfiltered_when_configured() {
        let mut config = EngineConfig::default();
        config.alternatives.respect_business_hours = false;
        let engine = SchedulingEngine::new(&config);
        let bookings = vec![Booking::new("b1", at("2025-03-10", "09:00"), 60)];
        let found = engine.suggest_alternatives(at("2025-03-10", "09:00"), 60, &bookings, None);
        assert_eq!(hours(&found), vec!["06:00", "07:00", "08:00", "10:00"]);
    }

    #[test]
    fn test_editing_does_not_self_conflict() {
        let engine = SchedulingEngine::default();
        let bookings = vec![Booking::new("b1", at("2025-03-10", "10:00"), 60)];
        let request = BookingRequest::parse("2025-03-10", "10:00", 60)
            .unwrap()
            .with_add_on("reflexology")
            .editing("b1");
        assert!(engine.evaluate(&request, &bookings).is_conflict_free());
    }

    #[test]
    fn test_outside_hours_is_reported_not_rejected() {
        let engine = SchedulingEngine::default();
        let eval = engine.evaluate(&BookingRequest::parse("2025-03-09", "10:00", 60).unwrap(), &[]);
        assert!(eval.is_conflict_free());
        assert!(!eval.within_business_hours);
    }

    #[test]
    fn test_engine_slots_use_blocks_and_overrides() {
        let sunday = parse_date("2025-03-09").unwrap();
        let policy = BusinessHoursPolicy::default().with_override(sunday, BusinessHoursOverride::open_day());
        let engine = SchedulingEngine::default()
            .with_policy(policy)
            .with_blocks(vec![AvailabilityBlock::closed(sunday, clock(9, 0), clock(12, 0))]);

        let now = at("2025-03-01", "00:00");
        let slots: Vec<_> = engine
            .slots_in_range(sunday, sunday.succ_opt().unwrap(), 60, &[], now)
            .collect();
        assert_eq!(slots.len(), 5); // 12:00..16:00
        assert!(engine.hours_for(sunday).is_open());
    }

    #[test]
    fn test_alternatives_skip_closed_blocks() {
        let monday = parse_date("2025-03-10").unwrap();
        let engine = SchedulingEngine::default()
            .with_blocks(vec![AvailabilityBlock::closed(monday, clock(10, 0), clock(13, 0))]);
        let bookings = vec![Booking::new("b1", at("2025-03-10", "14:00"), 60)];

        let eval = engine.evaluate(&BookingRequest::parse("2025-03-10", "14:00", 60).unwrap(), &bookings);
        assert_eq!(hours(&eval.alternatives), vec!["13:00", "15:00", "16:00"]);

        let now = at("2025-03-01", "00:00");
        let open: Vec<String> = engine
            .slots_in_range(monday, monday.succ_opt().unwrap(), 60, &bookings, now)
            .map(|s| format_time(s.start))
            .collect();
        assert!(eval.alternatives.iter().all(|a| open.contains(&format_time(a.start.time()))));
    }

    #[test]
    fn test_open_block_counts_as_open_time() {
        let sunday = parse_date("2025-03-09").unwrap();
        let engine = SchedulingEngine::default()
            .with_blocks(vec![AvailabilityBlock::open(sunday, clock(10, 0), clock(12, 0))]);

        let inside = engine.evaluate(&BookingRequest::parse("2025-03-09", "10:00", 60).unwrap(), &[]);
        assert!(inside.within_business_hours);

        let overrun = engine.evaluate(&BookingRequest::parse("2025-03-09", "11:30", 60).unwrap(), &[]);
        assert!(!overrun.within_business_hours);
    }

    #[test]
    fn test_closed_block_is_outside_open_time() {
        let monday = parse_date("2025-03-10").unwrap();
        let engine = SchedulingEngine::default()
            .with_blocks(vec![AvailabilityBlock::closed(monday, clock(12, 0), clock(13, 0))]);
        assert!(!engine.fits_open_time(at("2025-03-10", "12:30"), 60));
        assert!(engine.fits_open_time(at("2025-03-10", "13:00"), 60));
    }

    #[test]
    fn test_huge_offset_from_config_does_not_panic() {
        let config = EngineConfig::from_toml_str("[alternatives]\nmax_hour_offset = 4000000000").unwrap();
        let engine = SchedulingEngine::new(&config);
        let bookings = vec![Booking::new("b1", at("2025-03-10", "14:00"), 60)];

        let eval = engine.evaluate(&BookingRequest::parse("2025-03-10", "14:00", 60).unwrap(), &bookings);
        // the offset window is capped at 23 hours; the first four open hours win
        assert_eq!(
            hours(&eval.alternatives),
            vec!["09:00", "10:00", "11:00", "12:00"]
        );
    }

    #[test]
    fn test_evaluation_serializes() {
        let engine = SchedulingEngine::default();
        let eval = engine.evaluate(&BookingRequest::parse("2025-03-10", "09:00", 60).unwrap(), &[]);
        let json = serde_json::to_value(&eval).unwrap();
        assert_eq!(json["duration_minutes"], 60);
        assert_eq!(json["start"], "2025-03-10T09:00:00");
    }
}
