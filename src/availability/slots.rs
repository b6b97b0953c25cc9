//! Slot generation.
//!
//! # Algorithm
//!
//! For each date in `[start_date, end_date)`:
//! 1. Resolve the day's open windows: the business-hours window plus any
//!    admin open blocks, merged. A closed day with no open block is skipped.
//! 2. Step through each window from its opening time in increments of the
//!    session length, emitting every start strictly before closing time.
//! 3. Drop starts that are not strictly after `now`, that collide with an
//!    active booking under the [`BookedSlotRule`], or whose session
//!    overlaps an admin closed block.
//!
//! Days are planned one at a time as the iterator advances, so long ranges
//! cost nothing until consumed.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::policy::{BusinessHoursPolicy, SessionFit};
use crate::models::time::time_from_minutes;
use crate::models::{AvailabilityBlock, Booking, Slot, TimeRange};

/// How existing bookings remove generated slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum BookedSlotRule {
    /// A start is taken when it lies strictly within `minutes` of a
    /// booking's start on the same date, whatever the booking's length.
    Proximity { minutes: u32 },
    /// A start is taken when its session overlaps a booking's actual
    /// `[start, end)` interval.
    ExactOverlap,
}

impl BookedSlotRule {
    /// Whether a session at `candidate` is taken by `booked`.
    pub fn excludes(&self, candidate: &TimeRange, booked: &TimeRange) -> bool {
        match *self {
            BookedSlotRule::Proximity { minutes } => {
                (candidate.start_min - booked.start_min).abs() < i64::from(minutes)
            }
            BookedSlotRule::ExactOverlap => candidate.overlaps(booked),
        }
    }
}

impl Default for BookedSlotRule {
    fn default() -> Self {
        BookedSlotRule::Proximity { minutes: 30 }
    }
}

/// Enumerates bookable slots from a business-hours policy.
///
/// # Example
///
/// ```
/// use u_booking::availability::{BusinessHoursPolicy, SlotGenerator};
/// use u_booking::models::time::{parse_date, parse_start};
///
/// let policy = BusinessHoursPolicy::default();
/// let generator = SlotGenerator::new(&policy);
/// let monday = parse_date("2025-03-10").unwrap();
/// let now = parse_start("2025-03-01", "00:00").unwrap();
///
/// let slots: Vec<_> = generator
///     .slots_in_range(monday, monday.succ_opt().unwrap(), 60, &[], now)
///     .collect();
/// assert_eq!(slots.len(), 8); // 09:00 .. 16:00
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SlotGenerator<'a> {
    policy: &'a BusinessHoursPolicy,
    blocks: &'a [AvailabilityBlock],
    rule: BookedSlotRule,
}

impl<'a> SlotGenerator<'a> {
    /// Creates a generator with no admin blocks and the default
    /// 30-minute proximity rule.
    pub fn new(policy: &'a BusinessHoursPolicy) -> Self {
        Self {
            policy,
            blocks: &[],
            rule: BookedSlotRule::default(),
        }
    }

    /// Sets admin availability blocks.
    pub fn with_blocks(mut self, blocks: &'a [AvailabilityBlock]) -> Self {
        self.blocks = blocks;
        self
    }

    /// Sets the booked-slot rule.
    pub fn with_rule(mut self, rule: BookedSlotRule) -> Self {
        self.rule = rule;
        self
    }

    /// Lazily enumerates slots for dates in `[start_date, end_date)`.
    ///
    /// The sequence is finite; call again for another range. A zero
    /// session length yields no slots.
    pub fn slots_in_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        session_minutes: u32,
        bookings: &'a [Booking],
        now: NaiveDateTime,
    ) -> Slots<'a> {
        Slots {
            generator: *self,
            bookings,
            session_minutes,
            now,
            next_date: (session_minutes > 0).then_some(start_date),
            end_date,
            day: None,
        }
    }

    /// All slots on a single date.
    pub fn slots_on(
        &self,
        date: NaiveDate,
        session_minutes: u32,
        bookings: &'a [Booking],
        now: NaiveDateTime,
    ) -> Vec<Slot> {
        match date.succ_opt() {
            Some(next) => self
                .slots_in_range(date, next, session_minutes, bookings, now)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Open windows for `date`: business hours plus admin open blocks,
    /// merged and sorted.
    pub fn open_windows(&self, date: NaiveDate) -> Vec<TimeRange> {
        let mut windows: Vec<TimeRange> = self
            .policy
            .hours_for(date)
            .hours()
            .map(|h| h.range())
            .into_iter()
            .chain(
                self.blocks
                    .iter()
                    .filter(|b| b.date == date && b.is_available)
                    .map(AvailabilityBlock::range),
            )
            .filter(|w| w.duration_min() > 0)
            .collect();
        merge_ranges(&mut windows);
        windows
    }

    /// Whether a session starting at `start` is open time: it lies inside
    /// the date's open windows (touching windows count as one) and overlaps
    /// no admin closed block. Bookings and `now` are not considered.
    pub fn fits_session(&self, start: NaiveDateTime, duration_minutes: u32) -> bool {
        let date = start.date();
        let session = TimeRange::starting_at(start.time(), duration_minutes);

        let mut reach = session.start_min;
        let mut opened = false;
        for window in self.open_windows(date) {
            if window.start_min <= reach && reach < window.end_min {
                reach = window.end_min;
                opened = true;
            }
        }
        if !opened || reach < session.end_min {
            return false;
        }

        !self
            .blocks
            .iter()
            .any(|b| b.date == date && !b.is_available && b.range().overlaps(&session))
    }

    fn plan_day(&self, date: NaiveDate, bookings: &[Booking]) -> Option<DayPlan> {
        let windows = self.open_windows(date);
        if windows.is_empty() {
            trace!(%date, "closed, skipping");
            return None;
        }

        let blocked = self
            .blocks
            .iter()
            .filter(|b| b.date == date && !b.is_available)
            .map(AvailabilityBlock::range)
            .collect();
        let booked = bookings
            .iter()
            .filter(|b| b.is_active() && b.date() == date)
            .map(Booking::time_range)
            .collect();

        Some(DayPlan {
            date,
            cursor: windows[0].start_min,
            windows,
            window_idx: 0,
            blocked,
            booked,
        })
    }
}

impl SessionFit for SlotGenerator<'_> {
    fn fits(&self, start: NaiveDateTime, duration_minutes: u32) -> bool {
        self.fits_session(start, duration_minutes)
    }
}

/// Sorts ranges and coalesces overlapping ones.
fn merge_ranges(ranges: &mut Vec<TimeRange>) {
    ranges.sort_by_key(|r| (r.start_min, r.end_min));
    let mut merged: Vec<TimeRange> = Vec::with_capacity(ranges.len());
    for range in ranges.drain(..) {
        match merged.last_mut() {
            Some(last) if range.start_min < last.end_min => {
                last.end_min = last.end_min.max(range.end_min);
            }
            _ => merged.push(range),
        }
    }
    *ranges = merged;
}

/// One day's candidate state.
#[derive(Debug)]
struct DayPlan {
    date: NaiveDate,
    windows: Vec<TimeRange>,
    window_idx: usize,
    cursor: i64,
    blocked: Vec<TimeRange>,
    booked: Vec<TimeRange>,
}

impl DayPlan {
    /// Next raw candidate start, advancing the cursor.
    fn advance(&mut self, step: i64) -> Option<i64> {
        while let Some(window) = self.windows.get(self.window_idx) {
            if self.cursor < window.end_min {
                let start = self.cursor;
                self.cursor += step;
                return Some(start);
            }
            self.window_idx += 1;
            if let Some(next) = self.windows.get(self.window_idx) {
                self.cursor = next.start_min;
            }
        }
        None
    }
}

/// Lazy slot sequence returned by [`SlotGenerator::slots_in_range`].
#[derive(Debug)]
pub struct Slots<'a> {
    generator: SlotGenerator<'a>,
    bookings: &'a [Booking],
    session_minutes: u32,
    now: NaiveDateTime,
    next_date: Option<NaiveDate>,
    end_date: NaiveDate,
    day: Option<DayPlan>,
}

impl Slots<'_> {
    fn next_in_day(&mut self) -> Option<Slot> {
        let step = i64::from(self.session_minutes);
        let rule = self.generator.rule;
        let day = self.day.as_mut()?;

        while let Some(start_min) = day.advance(step) {
            let Some(start) = time_from_minutes(start_min) else {
                continue;
            };
            if day.date.and_time(start) <= self.now {
                continue;
            }
            let session = TimeRange::starting_at(start, self.session_minutes);
            if day.booked.iter().any(|b| rule.excludes(&session, b)) {
                continue;
            }
            if day.blocked.iter().any(|b| b.overlaps(&session)) {
                continue;
            }
            return Some(Slot::new(day.date, start, self.session_minutes));
        }
        None
    }
}

impl Iterator for Slots<'_> {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        loop {
            if let Some(slot) = self.next_in_day() {
                return Some(slot);
            }
            self.day = None;

            let date = self.next_date.filter(|d| *d < self.end_date)?;
            self.next_date = date.succ_opt();
            self.day = self.generator.plan_day(date, self.bookings);
        }
    }
}
