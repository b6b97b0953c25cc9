//! Business-hours models.
//!
//! The weekly table holds default opening hours per weekday. Per-date
//! overrides and admin availability blocks are sparse exceptions layered
//! on top of it; none of them mutates the weekly table.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::time::{hhmm, TimeRange};

/// Builds a wall-clock time from literal hour/minute values.
pub(crate) fn clock(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// An open window within one day [start, end).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpeningHours {
    /// Opening time.
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// Closing time (exclusive).
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl OpeningHours {
    /// Creates a window.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Window as minutes since midnight.
    pub fn range(&self) -> TimeRange {
        TimeRange::between(self.start, self.end)
    }

    /// Whether the window has positive length.
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }
}

impl Default for OpeningHours {
    /// 09:00–17:00.
    fn default() -> Self {
        Self::new(clock(9, 0), clock(17, 0))
    }
}

/// Default hours for one weekday.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayHours {
    /// Opening time.
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// Closing time (exclusive).
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    /// Whether the practice opens on this weekday at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl DayHours {
    /// An enabled day.
    pub fn open(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start,
            end,
            enabled: true,
        }
    }

    /// A disabled day. The stored window is kept for when it is re-enabled.
    pub fn closed(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start,
            end,
            enabled: false,
        }
    }

    /// The stored window, regardless of `enabled`.
    pub fn window(&self) -> OpeningHours {
        OpeningHours::new(self.start, self.end)
    }
}

/// Default weekly opening table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WeeklyHours {
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
    pub sunday: DayHours,
}

impl WeeklyHours {
    /// Hours for a weekday.
    pub fn get(&self, weekday: Weekday) -> &DayHours {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    /// Replaces the hours for a weekday.
    pub fn with_day(mut self, weekday: Weekday, hours: DayHours) -> Self {
        let slot = match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        };
        *slot = hours;
        self
    }
}

impl Default for WeeklyHours {
    /// Mon–Fri 09:00–17:00, Sat 10:00–16:00, Sunday closed.
    fn default() -> Self {
        let weekday = DayHours::open(clock(9, 0), clock(17, 0));
        Self {
            monday: weekday,
            tuesday: weekday,
            wednesday: weekday,
            thursday: weekday,
            friday: weekday,
            saturday: DayHours::open(clock(10, 0), clock(16, 0)),
            sunday: DayHours::closed(clock(10, 0), clock(16, 0)),
        }
    }
}

/// Admin exceptions for one exact date.
///
/// Any combination may be set; [`BusinessHoursPolicy`](crate::availability::BusinessHoursPolicy)
/// applies them in precedence order: custom hours, day override,
/// holiday override.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BusinessHoursOverride {
    /// Open on this date even though it is a holiday.
    pub holiday_override: bool,
    /// Open on this date even though the weekday is normally closed.
    pub day_override: bool,
    /// Explicit hours for this date.
    pub custom_hours: Option<OpeningHours>,
}

impl BusinessHoursOverride {
    /// Forces a holiday open with default weekday hours.
    pub fn open_holiday() -> Self {
        Self {
            holiday_override: true,
            ..Self::default()
        }
    }

    /// Forces a normally-closed weekday open.
    pub fn open_day() -> Self {
        Self {
            day_override: true,
            ..Self::default()
        }
    }

    /// Sets explicit hours for the date.
    pub fn custom(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            custom_hours: Some(OpeningHours::new(start, end)),
            ..Self::default()
        }
    }

    /// Combines two overrides for the same date; set flags accumulate and
    /// `other`'s custom hours win.
    pub fn merge(self, other: Self) -> Self {
        Self {
            holiday_override: self.holiday_override || other.holiday_override,
            day_override: self.day_override || other.day_override,
            custom_hours: other.custom_hours.or(self.custom_hours),
        }
    }
}

/// An admin-managed open or closed block on one date.
///
/// Blocks on the same date must not overlap. Open blocks add bookable
/// time; closed blocks remove it and win over any open window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvailabilityBlock {
    /// Date of the block.
    pub date: NaiveDate,
    /// Block start.
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    /// Block end (exclusive).
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    /// `true` = bookable, `false` = blocked.
    pub is_available: bool,
}

impl AvailabilityBlock {
    /// An open block.
    pub fn open(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            date,
            start_time,
            end_time,
            is_available: true,
        }
    }

    /// A closed block.
    pub fn closed(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            date,
            start_time,
            end_time,
            is_available: false,
        }
    }

    /// Block as minutes since midnight.
    pub fn range(&self) -> TimeRange {
        TimeRange::between(self.start_time, self.end_time)
    }
}
