//! Input validation for availability requests.
//!
//! The engine assumes well-formed inputs. These checks let callers catch
//! malformed data before invoking it. Detects:
//! - Duplicate booking and add-on IDs
//! - Zero-length bookings
//! - Inverted or empty time ranges (blocks, custom hours, weekly and
//!   fallback hours)
//! - Overlapping admin blocks on the same date

use std::collections::{BTreeMap, HashSet};

use chrono::{NaiveDate, Weekday};

use crate::config::EngineConfig;
use crate::models::time::{format_date, format_time};
use crate::models::{AddOnCatalog, AvailabilityBlock, Booking, BusinessHoursOverride, OpeningHours, WeeklyHours};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A booking has a zero duration.
    InvalidDuration,
    /// A time range ends at or before its start.
    InvalidTimeRange,
    /// Two admin blocks on one date overlap.
    OverlappingBlocks,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn into_result(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks bookings: unique IDs and positive durations.
pub fn validate_bookings(bookings: &[Booking]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for b in bookings {
        if !ids.insert(b.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate booking ID: {}", b.id),
            ));
        }
        if b.duration_minutes == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Booking '{}' has a zero duration", b.id),
            ));
        }
    }

    into_result(errors)
}

/// Checks admin blocks: positive length and no overlap within a date.
pub fn validate_blocks(blocks: &[AvailabilityBlock]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut by_date: BTreeMap<NaiveDate, Vec<&AvailabilityBlock>> = BTreeMap::new();

    for block in blocks {
        if block.start_time >= block.end_time {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeRange,
                format!(
                    "Block on {} ends at {} before it starts at {}",
                    format_date(block.date),
                    format_time(block.end_time),
                    format_time(block.start_time)
                ),
            ));
            continue;
        }
        by_date.entry(block.date).or_default().push(block);
    }

    for (date, mut day) in by_date {
        day.sort_by_key(|b| b.start_time);
        for pair in day.windows(2) {
            if pair[0].range().overlaps(&pair[1].range()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::OverlappingBlocks,
                    format!(
                        "Blocks on {} overlap: {}-{} and {}-{}",
                        format_date(date),
                        format_time(pair[0].start_time),
                        format_time(pair[0].end_time),
                        format_time(pair[1].start_time),
                        format_time(pair[1].end_time)
                    ),
                ));
            }
        }
    }

    into_result(errors)
}

/// Checks the add-on catalog for duplicate IDs.
pub fn validate_catalog(catalog: &AddOnCatalog) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for add_on in catalog.items() {
        if !ids.insert(add_on.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate add-on ID: {}", add_on.id),
            ));
        }
    }

    into_result(errors)
}

/// Checks custom-hours overrides for inverted windows.
pub fn validate_overrides(overrides: &BTreeMap<NaiveDate, BusinessHoursOverride>) -> ValidationResult {
    let errors = overrides
        .iter()
        .filter_map(|(date, over)| {
            let hours = over.custom_hours?;
            (!hours.is_valid()).then(|| {
                ValidationError::new(
                    ValidationErrorKind::InvalidTimeRange,
                    format!(
                        "Custom hours on {} close at {} before opening at {}",
                        format_date(*date),
                        format_time(hours.end),
                        format_time(hours.start)
                    ),
                )
            })
        })
        .collect();

    into_result(errors)
}

/// Checks enabled weekdays and the fallback window for inverted or empty
/// hours. Disabled weekdays are not checked.
pub fn validate_hours(weekly: &WeeklyHours, fallback: &OpeningHours) -> ValidationResult {
    const WEEK: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    let mut errors: Vec<ValidationError> = WEEK
        .iter()
        .filter_map(|&weekday| {
            let day = weekly.get(weekday);
            (day.enabled && !day.window().is_valid()).then(|| {
                ValidationError::new(
                    ValidationErrorKind::InvalidTimeRange,
                    format!(
                        "Weekly hours for {weekday} close at {} before opening at {}",
                        format_time(day.end),
                        format_time(day.start)
                    ),
                )
            })
        })
        .collect();

    if !fallback.is_valid() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidTimeRange,
            format!(
                "Fallback hours close at {} before opening at {}",
                format_time(fallback.end),
                format_time(fallback.start)
            ),
        ));
    }

    into_result(errors)
}

/// Runs every configuration check and collects all errors.
pub fn validate_config(config: &EngineConfig) -> ValidationResult {
    let errors: Vec<ValidationError> = [
        validate_hours(&config.weekly_hours, &config.fallback_hours),
        validate_blocks(&config.blocks),
        validate_catalog(&config.add_ons),
        validate_overrides(&config.overrides),
    ]
    .into_iter()
    .filter_map(Result::err)
    .flatten()
    .collect();

    into_result(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time::{parse_date, parse_start};
    use crate::models::{clock, AddOn, DayHours};

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_valid_bookings() {
        let bookings = vec![
            Booking::new("b1", parse_start("2025-03-10", "09:00").unwrap(), 60),
            Booking::new("b2", parse_start("2025-03-10", "10:00").unwrap(), 60),
        ];
        assert!(validate_bookings(&bookings).is_ok());
    }

    #[test]
    fn test_duplicate_booking_and_zero_duration() {
        let start = parse_start("2025-03-10", "09:00").unwrap();
        let bookings = vec![Booking::new("b1", start, 60), Booking::new("b1", start, 0)];
        let errors = validate_bookings(&bookings).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateId);
        assert_eq!(errors[1].kind, ValidationErrorKind::InvalidDuration);
    }

    #[test]
    fn test_overlapping_blocks() {
        let d = date("2025-03-10");
        let blocks = vec![
            AvailabilityBlock::closed(d, clock(12, 0), clock(13, 0)),
            AvailabilityBlock::open(d, clock(12, 30), clock(14, 0)),
            AvailabilityBlock::open(date("2025-03-11"), clock(12, 30), clock(14, 0)),
        ];
        let errors = validate_blocks(&blocks).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::OverlappingBlocks);
        assert!(errors[0].message.contains("2025-03-10"));
    }

    #[test]
    fn test_touching_blocks_ok() {
        let d = date("2025-03-10");
        let blocks = vec![
            AvailabilityBlock::closed(d, clock(12, 0), clock(13, 0)),
            AvailabilityBlock::open(d, clock(13, 0), clock(14, 0)),
        ];
        assert!(validate_blocks(&blocks).is_ok());
    }

    #[test]
    fn test_inverted_block() {
        let blocks = vec![AvailabilityBlock::closed(date("2025-03-10"), clock(14, 0), clock(13, 0))];
        let errors = validate_blocks(&blocks).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidTimeRange);
    }

    #[test]
    fn test_duplicate_add_on() {
        let catalog = AddOnCatalog::standard().with_add_on(AddOn::new("cupping", "Cupping again"));
        let errors = validate_catalog(&catalog).unwrap_err();
        assert_eq!(errors[0].message, "Duplicate add-on ID: cupping");
        assert!(validate_catalog(&AddOnCatalog::standard()).is_ok());
    }

    #[test]
    fn test_inverted_custom_hours() {
        let mut overrides = BTreeMap::new();
        overrides.insert(date("2025-03-10"), BusinessHoursOverride::custom(clock(15, 0), clock(9, 0)));
        overrides.insert(date("2025-03-11"), BusinessHoursOverride::open_day());
        let errors = validate_overrides(&overrides).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidTimeRange);
    }

    #[test]
    fn test_inverted_weekly_and_fallback_hours() {
        assert!(validate_hours(&WeeklyHours::default(), &OpeningHours::default()).is_ok());

        let weekly = WeeklyHours::default()
            .with_day(Weekday::Tue, DayHours::open(clock(17, 0), clock(9, 0)))
            .with_day(Weekday::Sun, DayHours::closed(clock(12, 0), clock(12, 0)));
        let fallback = OpeningHours::new(clock(16, 0), clock(10, 0));

        let errors = validate_hours(&weekly, &fallback).unwrap_err();
        // the disabled Sunday window is ignored
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind == ValidationErrorKind::InvalidTimeRange));
        assert_eq!(errors[0].message, "Weekly hours for Tue close at 09:00 before opening at 17:00");
        assert!(errors[1].message.starts_with("Fallback hours"));
    }

    #[test]
    fn test_validate_config_collects_all() {
        let mut config = EngineConfig::default();
        assert!(validate_config(&config).is_ok());

        let d = date("2025-03-10");
        config.blocks = vec![AvailabilityBlock::closed(d, clock(14, 0), clock(13, 0))];
        config.overrides.insert(d, BusinessHoursOverride::custom(clock(15, 0), clock(9, 0)));
        config.add_ons = AddOnCatalog::new()
            .with_add_on(AddOn::new("x", "X"))
            .with_add_on(AddOn::new("x", "X"));
        config.fallback_hours = OpeningHours::new(clock(12, 0), clock(12, 0));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
