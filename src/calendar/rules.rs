//! Holiday date rules.
//!
//! A rule resolves to at most one date per year. Floating rules
//! ("3rd Monday of January") are resolved by walking from a month
//! boundary to the wanted weekday.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Days from `from` forward to the next `to` (0..=6).
fn days_until(from: Weekday, to: Weekday) -> u64 {
    let from = u64::from(from.num_days_from_monday());
    let to = u64::from(to.num_days_from_monday());
    (7 + to - from) % 7
}

/// The `n`-th occurrence (1-based) of `weekday` in `month`.
///
/// Finds the first occurrence in the month, then adds `(n - 1) * 7` days.
/// Returns `None` for `n == 0`, for an invalid year/month, or when the
/// `n`-th occurrence falls outside the month.
///
/// ```
/// use chrono::{NaiveDate, Weekday};
/// use u_booking::calendar::nth_weekday;
///
/// // MLK Day 2025: third Monday of January.
/// assert_eq!(
///     nth_weekday(2025, 1, Weekday::Mon, 3),
///     NaiveDate::from_ymd_opt(2025, 1, 20)
/// );
/// ```
pub fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    if n == 0 {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = days_until(first.weekday(), weekday) + u64::from(n - 1) * 7;
    let date = first.checked_add_days(Days::new(offset))?;
    (date.month() == month).then_some(date)
}

/// The last occurrence of `weekday` in `month`.
///
/// Starts from the month's final day and walks backward to the most
/// recent matching weekday.
pub fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let last = last_day_of_month(year, month)?;
    let back = days_until(weekday, last.weekday());
    last.checked_sub_days(Days::new(back))
}

/// Final calendar day of a month.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    // Validate the month itself before stepping back from the next one.
    NaiveDate::from_ymd_opt(year, month, 1)?;
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// How a holiday's date is derived for a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum HolidayRule {
    /// Same month and day every year (e.g., July 4).
    Fixed { month: u32, day: u32 },
    /// `n`-th `weekday` of `month` (e.g., 4th Thursday of November).
    NthWeekday { month: u32, weekday: Weekday, n: u32 },
    /// Last `weekday` of `month` (e.g., last Monday of May).
    LastWeekday { month: u32, weekday: Weekday },
}

impl HolidayRule {
    /// Fixed-date rule.
    pub fn fixed(month: u32, day: u32) -> Self {
        HolidayRule::Fixed { month, day }
    }

    /// Nth-weekday rule.
    pub fn nth(n: u32, weekday: Weekday, month: u32) -> Self {
        HolidayRule::NthWeekday { month, weekday, n }
    }

    /// Last-weekday rule.
    pub fn last(weekday: Weekday, month: u32) -> Self {
        HolidayRule::LastWeekday { month, weekday }
    }

    /// Resolves the rule for `year`.
    ///
    /// `None` when the rule names a date that does not exist that year
    /// (Feb 29 outside leap years, a missing 5th weekday).
    pub fn resolve(&self, year: i32) -> Option<NaiveDate> {
        match *self {
            HolidayRule::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day),
            HolidayRule::NthWeekday { month, weekday, n } => nth_weekday(year, month, weekday, n),
            HolidayRule::LastWeekday { month, weekday } => last_weekday(year, month, weekday),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_nth_weekday() {
        assert_eq!(nth_weekday(2025, 1, Weekday::Mon, 3), Some(date(2025, 1, 20)));
        // Labor Day 2025: first Monday of September
        assert_eq!(nth_weekday(2025, 9, Weekday::Mon, 1), Some(date(2025, 9, 1)));
        // Thanksgiving 2024: fourth Thursday of November
        assert_eq!(nth_weekday(2024, 11, Weekday::Thu, 4), Some(date(2024, 11, 28)));
    }

    #[test]
    fn test_nth_weekday_out_of_month() {
        // February 2025 has only four Mondays.
        assert_eq!(nth_weekday(2025, 2, Weekday::Mon, 5), None);
        assert_eq!(nth_weekday(2025, 2, Weekday::Mon, 0), None);
        assert_eq!(nth_weekday(2025, 13, Weekday::Mon, 1), None);
    }

    #[test]
    fn test_last_weekday() {
        assert_eq!(last_weekday(2025, 5, Weekday::Mon), Some(date(2025, 5, 26)));
        // Month ending on the wanted weekday: May 31, 2021 was a Monday
        assert_eq!(last_weekday(2021, 5, Weekday::Mon), Some(date(2021, 5, 31)));
        assert_eq!(last_weekday(2025, 12, Weekday::Wed), Some(date(2025, 12, 31)));
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2024, 2), Some(date(2024, 2, 29)));
        assert_eq!(last_day_of_month(2025, 2), Some(date(2025, 2, 28)));
        assert_eq!(last_day_of_month(2025, 12), Some(date(2025, 12, 31)));
        assert_eq!(last_day_of_month(2025, 0), None);
    }

    #[test]
    fn test_rule_resolve() {
        assert_eq!(HolidayRule::fixed(7, 4).resolve(2025), Some(date(2025, 7, 4)));
        assert_eq!(HolidayRule::fixed(2, 29).resolve(2025), None);
        assert_eq!(
            HolidayRule::nth(2, Weekday::Mon, 10).resolve(2025),
            Some(date(2025, 10, 13))
        );
    }

    #[test]
    fn test_rule_deserialize() {
        let rule: HolidayRule =
            serde_json::from_str(r#"{"kind":"nth-weekday","month":11,"weekday":"Thu","n":4}"#).unwrap();
        assert_eq!(rule, HolidayRule::nth(4, Weekday::Thu, 11));
    }
}
