//! Business-hours resolution.
//!
//! # Precedence
//! For a given date, the first matching rule wins:
//! 1. Custom hours override for the date.
//! 2. Day override: opens the date; a normally-closed weekday uses the
//!    fallback window, an enabled weekday keeps its weekly hours.
//! 3. Holiday override on a holiday: the weekday's default hours.
//! 4. Holiday without override: closed.
//! 5. The weekly table for the weekday.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar::HolidayCalendar;
use crate::models::{BusinessHoursOverride, OpeningHours, TimeRange, WeeklyHours};

/// Which rule produced a date's opening hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoursSource {
    /// Explicit hours set for the date.
    CustomHours,
    /// Normally-closed weekday forced open.
    DayOverride,
    /// Holiday forced open.
    HolidayOverride,
    /// Default weekly table.
    Weekly,
}

/// Why a date is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClosureReason {
    /// The date is a holiday and not overridden.
    Holiday,
    /// The weekday is disabled in the weekly table.
    WeeklyClosed,
}

/// Resolved opening hours for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolvedHours {
    /// The practice is open.
    Open {
        /// Opening window for the date.
        hours: OpeningHours,
        /// Rule that produced the window.
        source: HoursSource,
    },
    /// The practice is closed all day.
    Closed(ClosureReason),
}

/// Decides whether a whole session can be held at a given start.
///
/// Used to filter alternative suggestions. [`BusinessHoursPolicy`] checks
/// opening hours only; [`SlotGenerator`](super::SlotGenerator) also applies
/// admin availability blocks.
pub trait SessionFit {
    /// Whether `[start, start + duration_minutes)` is bookable time.
    fn fits(&self, start: NaiveDateTime, duration_minutes: u32) -> bool;
}

impl ResolvedHours {
    /// Whether the practice is open.
    pub fn is_open(&self) -> bool {
        matches!(self, ResolvedHours::Open { .. })
    }

    /// Opening window, if open.
    pub fn hours(&self) -> Option<OpeningHours> {
        match self {
            ResolvedHours::Open { hours, .. } => Some(*hours),
            ResolvedHours::Closed(_) => None,
        }
    }

    fn open(hours: OpeningHours, source: HoursSource) -> Self {
        ResolvedHours::Open { hours, source }
    }
}

/// Weekly opening hours plus per-date exceptions.
///
/// # Example
///
/// ```
/// use u_booking::availability::BusinessHoursPolicy;
/// use u_booking::models::{time::parse_date, BusinessHoursOverride, WeeklyHours};
///
/// let sunday = parse_date("2025-03-09").unwrap();
/// let policy = BusinessHoursPolicy::new(WeeklyHours::default());
/// assert!(!policy.hours_for(sunday).is_open());
///
/// let policy = policy.with_override(sunday, BusinessHoursOverride::open_day());
/// assert!(policy.hours_for(sunday).is_open());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessHoursPolicy {
    weekly: WeeklyHours,
    fallback: OpeningHours,
    overrides: BTreeMap<NaiveDate, BusinessHoursOverride>,
    holidays: HolidayCalendar,
}

impl BusinessHoursPolicy {
    /// Creates a policy with the standard holiday calendar and a
    /// 09:00–17:00 fallback window.
    pub fn new(weekly: WeeklyHours) -> Self {
        Self {
            weekly,
            fallback: OpeningHours::default(),
            overrides: BTreeMap::new(),
            holidays: HolidayCalendar::default(),
        }
    }

    /// Sets the window used when a normally-closed weekday is forced open.
    pub fn with_fallback(mut self, fallback: OpeningHours) -> Self {
        self.fallback = fallback;
        self
    }

    /// Replaces the holiday calendar.
    pub fn with_holidays(mut self, holidays: HolidayCalendar) -> Self {
        self.holidays = holidays;
        self
    }

    /// Adds an override for `date`, merging with any existing one.
    pub fn with_override(mut self, date: NaiveDate, over: BusinessHoursOverride) -> Self {
        self.add_override(date, over);
        self
    }

    /// Adds an override for `date` in place.
    pub fn add_override(&mut self, date: NaiveDate, over: BusinessHoursOverride) {
        let merged = match self.overrides.get(&date) {
            Some(existing) => existing.merge(over),
            None => over,
        };
        self.overrides.insert(date, merged);
    }

    /// Default weekly table.
    pub fn weekly(&self) -> &WeeklyHours {
        &self.weekly
    }

    /// Holiday calendar in use.
    pub fn holidays(&self) -> &HolidayCalendar {
        &self.holidays
    }

    /// Override for `date`, if any.
    pub fn override_for(&self, date: NaiveDate) -> Option<&BusinessHoursOverride> {
        self.overrides.get(&date)
    }

    /// All overrides, ordered by date.
    pub fn overrides(&self) -> &BTreeMap<NaiveDate, BusinessHoursOverride> {
        &self.overrides
    }

    /// Resolves opening hours for `date`.
    pub fn hours_for(&self, date: NaiveDate) -> ResolvedHours {
        let over = self.overrides.get(&date).copied().unwrap_or_default();
        let day = self.weekly.get(date.weekday());

        if let Some(custom) = over.custom_hours {
            return ResolvedHours::open(custom, HoursSource::CustomHours);
        }

        if over.day_override {
            let hours = if day.enabled { day.window() } else { self.fallback };
            return ResolvedHours::open(hours, HoursSource::DayOverride);
        }

        if self.holidays.is_holiday(date) {
            if !over.holiday_override {
                return ResolvedHours::Closed(ClosureReason::Holiday);
            }
            return if day.enabled {
                ResolvedHours::open(day.window(), HoursSource::HolidayOverride)
            } else {
                ResolvedHours::Closed(ClosureReason::WeeklyClosed)
            };
        }

        if day.enabled {
            ResolvedHours::open(day.window(), HoursSource::Weekly)
        } else {
            ResolvedHours::Closed(ClosureReason::WeeklyClosed)
        }
    }

    /// Whether a session starting at `start` fits entirely inside the
    /// date's resolved opening hours.
    pub fn fits_within_hours(&self, start: NaiveDateTime, duration_minutes: u32) -> bool {
        match self.hours_for(start.date()).hours() {
            Some(hours) => hours
                .range()
                .covers(&TimeRange::starting_at(start.time(), duration_minutes)),
            None => false,
        }
    }
}

impl SessionFit for BusinessHoursPolicy {
    fn fits(&self, start: NaiveDateTime, duration_minutes: u32) -> bool {
        self.fits_within_hours(start, duration_minutes)
    }
}

impl Default for BusinessHoursPolicy {
    fn default() -> Self {
        Self::new(WeeklyHours::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{HolidayDefinition, HolidayRule};
    use crate::models::time::{parse_date, parse_start};
    use crate::models::{clock, DayHours};
    use chrono::Weekday;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_weekly_default() {
        let policy = BusinessHoursPolicy::default();
        // 2025-03-10 is a Monday
        assert_eq!(
            policy.hours_for(date("2025-03-10")),
            ResolvedHours::Open {
                hours: OpeningHours::new(clock(9, 0), clock(17, 0)),
                source: HoursSource::Weekly,
            }
        );
        assert_eq!(
            policy.hours_for(date("2025-03-15")).hours(),
            Some(OpeningHours::new(clock(10, 0), clock(16, 0)))
        );
    }

    #[test]
    fn test_sunday_closed_without_override() {
        let policy = BusinessHoursPolicy::default();
        assert_eq!(
            policy.hours_for(date("2025-03-09")),
            ResolvedHours::Closed(ClosureReason::WeeklyClosed)
        );
    }

    #[test]
    fn test_day_override_uses_fallback() {
        let sunday = date("2025-03-09");
        let fallback = OpeningHours::new(clock(11, 0), clock(15, 0));
        let policy = BusinessHoursPolicy::default()
            .with_fallback(fallback)
            .with_override(sunday, BusinessHoursOverride::open_day());

        assert_eq!(
            policy.hours_for(sunday),
            ResolvedHours::Open {
                hours: fallback,
                source: HoursSource::DayOverride,
            }
        );
        // The following Sunday is unaffected
        assert!(!policy.hours_for(date("2025-03-16")).is_open());
    }

    #[test]
    fn test_day_override_opens_holiday() {
        // Christmas 2025 is a Thursday
        let christmas = date("2025-12-25");
        let policy = BusinessHoursPolicy::default().with_override(christmas, BusinessHoursOverride::open_day());
        assert_eq!(
            policy.hours_for(christmas).hours(),
            Some(OpeningHours::new(clock(9, 0), clock(17, 0)))
        );
    }

    #[test]
    fn test_holiday_closed() {
        let policy = BusinessHoursPolicy::default();
        assert_eq!(
            policy.hours_for(date("2025-07-04")),
            ResolvedHours::Closed(ClosureReason::Holiday)
        );
    }

    #[test]
    fn test_holiday_override() {
        let july4 = date("2025-07-04"); // Friday
        let policy = BusinessHoursPolicy::default().with_override(july4, BusinessHoursOverride::open_holiday());
        assert_eq!(
            policy.hours_for(july4),
            ResolvedHours::Open {
                hours: OpeningHours::new(clock(9, 0), clock(17, 0)),
                source: HoursSource::HolidayOverride,
            }
        );
    }

    #[test]
    fn test_holiday_override_on_disabled_weekday() {
        // 2027-07-04 is a Sunday
        let july4 = date("2027-07-04");
        let policy = BusinessHoursPolicy::default().with_override(july4, BusinessHoursOverride::open_holiday());
        assert_eq!(
            policy.hours_for(july4),
            ResolvedHours::Closed(ClosureReason::WeeklyClosed)
        );
    }

    #[test]
    fn test_custom_hours_win() {
        let d = date("2025-07-04");
        let policy = BusinessHoursPolicy::default()
            .with_override(d, BusinessHoursOverride::open_holiday())
            .with_override(d, BusinessHoursOverride::custom(clock(12, 0), clock(14, 0)));
        assert_eq!(
            policy.hours_for(d),
            ResolvedHours::Open {
                hours: OpeningHours::new(clock(12, 0), clock(14, 0)),
                source: HoursSource::CustomHours,
            }
        );
        assert!(policy.override_for(d).unwrap().holiday_override);
    }

    #[test]
    fn test_custom_holidays() {
        let policy = BusinessHoursPolicy::default().with_holidays(
            HolidayCalendar::empty().with_holiday(HolidayDefinition::new("Retreat", HolidayRule::fixed(3, 10))),
        );
        assert!(!policy.hours_for(date("2025-03-10")).is_open());
        assert!(policy.hours_for(date("2025-07-04")).is_open());
    }

    #[test]
    fn test_disabled_weekday_in_table() {
        let weekly = WeeklyHours::default().with_day(Weekday::Wed, DayHours::closed(clock(9, 0), clock(17, 0)));
        let policy = BusinessHoursPolicy::new(weekly);
        assert!(!policy.hours_for(date("2025-03-12")).is_open());
    }

    #[test]
    fn test_fits_within_hours() {
        let policy = BusinessHoursPolicy::default();
        assert!(policy.fits_within_hours(parse_start("2025-03-10", "16:00").unwrap(), 60));
        assert!(!policy.fits_within_hours(parse_start("2025-03-10", "16:30").unwrap(), 60));
        assert!(!policy.fits_within_hours(parse_start("2025-03-10", "08:00").unwrap(), 60));
        assert!(!policy.fits_within_hours(parse_start("2025-03-09", "10:00").unwrap(), 60));
    }
}
