//! Holiday calendar.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::rules::HolidayRule;

/// A named holiday rule, optionally shifted by whole days
/// (e.g., "day before Thanksgiving" = Thanksgiving, offset -1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayDefinition {
    /// Display name.
    pub name: String,
    /// Base date rule.
    pub rule: HolidayRule,
    /// Days added to the resolved date.
    #[serde(default)]
    pub offset_days: i64,
}

impl HolidayDefinition {
    /// Creates an unshifted definition.
    pub fn new(name: impl Into<String>, rule: HolidayRule) -> Self {
        Self {
            name: name.into(),
            rule,
            offset_days: 0,
        }
    }

    /// Shifts the resolved date by `days`.
    pub fn with_offset(mut self, days: i64) -> Self {
        self.offset_days = days;
        self
    }

    /// Date of this holiday in `year`, if it falls within that year.
    pub fn date_in(&self, year: i32) -> Option<NaiveDate> {
        let base = self.rule.resolve(year)?;
        let magnitude = Days::new(self.offset_days.unsigned_abs());
        let date = if self.offset_days >= 0 {
            base.checked_add_days(magnitude)?
        } else {
            base.checked_sub_days(magnitude)?
        };
        (date.year() == year).then_some(date)
    }
}

/// A resolved holiday.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Holiday {
    /// Date the practice is closed.
    pub date: NaiveDate,
    /// Display name, e.g. "Thanksgiving".
    pub name: String,
}

/// Derives closed dates from a list of holiday rules.
///
/// Holiday sets are recomputed on every request and never stored, so the
/// same year always yields the same set.
///
/// ```
/// use chrono::NaiveDate;
/// use u_booking::calendar::HolidayCalendar;
///
/// let calendar = HolidayCalendar::default();
/// let closed = calendar.holidays_for(2025);
/// assert!(closed.contains(&NaiveDate::from_ymd_opt(2025, 5, 26).unwrap())); // Memorial Day
/// assert!(closed.contains(&NaiveDate::from_ymd_opt(2025, 11, 26).unwrap())); // day before Thanksgiving
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidayCalendar {
    definitions: Vec<HolidayDefinition>,
}

impl HolidayCalendar {
    /// A calendar with no holidays.
    pub fn empty() -> Self {
        Self {
            definitions: Vec::new(),
        }
    }

    /// The practice's standard US holiday list.
    pub fn us_practice() -> Self {
        use Weekday::{Mon, Thu};

        Self::empty()
            .with_holiday(HolidayDefinition::new("New Year's Day", HolidayRule::fixed(1, 1)))
            .with_holiday(HolidayDefinition::new("Martin Luther King Jr. Day", HolidayRule::nth(3, Mon, 1)))
            .with_holiday(HolidayDefinition::new("Presidents' Day", HolidayRule::nth(3, Mon, 2)))
            .with_holiday(HolidayDefinition::new("Memorial Day", HolidayRule::last(Mon, 5)))
            .with_holiday(HolidayDefinition::new("Juneteenth", HolidayRule::fixed(6, 19)))
            .with_holiday(HolidayDefinition::new("Independence Day", HolidayRule::fixed(7, 4)))
            .with_holiday(HolidayDefinition::new("Labor Day", HolidayRule::nth(1, Mon, 9)))
            .with_holiday(HolidayDefinition::new("Columbus Day", HolidayRule::nth(2, Mon, 10)))
            .with_holiday(HolidayDefinition::new("Veterans Day", HolidayRule::fixed(11, 11)))
            .with_holiday(
                HolidayDefinition::new("Day Before Thanksgiving", HolidayRule::nth(4, Thu, 11))
                    .with_offset(-1),
            )
            .with_holiday(HolidayDefinition::new("Thanksgiving", HolidayRule::nth(4, Thu, 11)))
            .with_holiday(HolidayDefinition::new("Christmas Eve", HolidayRule::fixed(12, 24)))
            .with_holiday(HolidayDefinition::new("Christmas Day", HolidayRule::fixed(12, 25)))
            .with_holiday(HolidayDefinition::new("New Year's Eve", HolidayRule::fixed(12, 31)))
    }

    /// Adds a holiday definition.
    pub fn with_holiday(mut self, definition: HolidayDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Adds several holiday definitions.
    pub fn extend(&mut self, definitions: impl IntoIterator<Item = HolidayDefinition>) {
        self.definitions.extend(definitions);
    }

    /// Holiday definitions, in insertion order.
    pub fn definitions(&self) -> &[HolidayDefinition] {
        &self.definitions
    }

    /// Closed dates for `year`.
    pub fn holidays_for(&self, year: i32) -> BTreeSet<NaiveDate> {
        self.definitions.iter().filter_map(|d| d.date_in(year)).collect()
    }

    /// Named holidays for `year`, ordered by date.
    pub fn observed(&self, year: i32) -> Vec<Holiday> {
        let mut holidays: Vec<Holiday> = self
            .definitions
            .iter()
            .filter_map(|d| {
                d.date_in(year).map(|date| Holiday {
                    date,
                    name: d.name.clone(),
                })
            })
            .collect();
        holidays.sort();
        holidays
    }

    /// Whether `date` is a holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_name(date).is_some()
    }

    /// Name of the holiday on `date`, if any.
    pub fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.definitions
            .iter()
            .find(|d| d.date_in(date.year()) == Some(date))
            .map(|d| d.name.as_str())
    }
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::us_practice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_us_practice_2025() {
        let closed = HolidayCalendar::us_practice().holidays_for(2025);
        let expected = [
            date(2025, 1, 1),
            date(2025, 1, 20),
            date(2025, 2, 17),
            date(2025, 5, 26),
            date(2025, 6, 19),
            date(2025, 7, 4),
            date(2025, 9, 1),
            date(2025, 10, 13),
            date(2025, 11, 11),
            date(2025, 11, 26),
            date(2025, 11, 27),
            date(2025, 12, 24),
            date(2025, 12, 25),
            date(2025, 12, 31),
        ];
        assert_eq!(closed, expected.into_iter().collect::<BTreeSet<_>>());
    }

    #[test]
    fn test_holiday_name() {
        let cal = HolidayCalendar::default();
        assert_eq!(cal.holiday_name(date(2024, 11, 28)), Some("Thanksgiving"));
        assert_eq!(cal.holiday_name(date(2024, 11, 27)), Some("Day Before Thanksgiving"));
        assert!(!cal.is_holiday(date(2024, 11, 29)));
    }

    #[test]
    fn test_observed_sorted() {
        let observed = HolidayCalendar::default().observed(2026);
        assert_eq!(observed.len(), 14);
        assert!(observed.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(observed[0].name, "New Year's Day");
    }

    #[test]
    fn test_offset_leaving_year_is_dropped() {
        let cal = HolidayCalendar::empty().with_holiday(
            HolidayDefinition::new("Eve of New Year", HolidayRule::fixed(1, 1)).with_offset(-1),
        );
        assert!(cal.holidays_for(2025).is_empty());
    }

    #[test]
    fn test_empty_calendar() {
        assert!(HolidayCalendar::empty().holidays_for(2025).is_empty());
    }

    proptest! {
        #[test]
        fn prop_holidays_deterministic_and_in_year(year in 1900i32..2200) {
            let cal = HolidayCalendar::default();
            let first = cal.holidays_for(year);
            let second = cal.holidays_for(year);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.iter().all(|d| d.year() == year));
        }

        #[test]
        fn prop_floating_holidays_land_on_weekday(year in 1900i32..2200) {
            let cal = HolidayCalendar::default();
            for holiday in cal.observed(year) {
                match holiday.name.as_str() {
                    "Thanksgiving" => prop_assert_eq!(holiday.date.weekday(), Weekday::Thu),
                    "Day Before Thanksgiving" => prop_assert_eq!(holiday.date.weekday(), Weekday::Wed),
                    "Memorial Day" | "Labor Day" | "Columbus Day" => {
                        prop_assert_eq!(holiday.date.weekday(), Weekday::Mon)
                    }
                    _ => {}
                }
            }
        }
    }
}
