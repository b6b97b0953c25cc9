//! Holiday calendar.
//!
//! Derives the set of closed dates for a year from fixed-date rules
//! ("July 4") and floating rules ("4th Thursday of November",
//! "last Monday of May"). Nothing is stored: each request recomputes
//! the set from the rules, so results are deterministic per year.

mod holidays;
mod rules;

pub use holidays::{Holiday, HolidayCalendar, HolidayDefinition};
pub use rules::{last_day_of_month, last_weekday, nth_weekday, HolidayRule};
