//! Engine configuration.
//!
//! Everything the engine needs besides the booking list and `now`:
//! weekly hours, per-date overrides, admin blocks, the add-on catalog,
//! holidays, and search settings. Every section is optional; missing
//! sections fall back to the practice defaults.
//!
//! ```toml
//! fallback_hours = { start = "10:00", end = "16:00" }
//!
//! [weekly_hours.sunday]
//! start = "10:00"
//! end = "14:00"
//! enabled = false
//!
//! [overrides."2025-12-24"]
//! holiday_override = true
//!
//! [[add_ons]]
//! id = "reflexology"
//! name = "Reflexology"
//! price_cents = 2000
//! duration_extension_minutes = 15
//!
//! [slots.booked_slot_rule]
//! mode = "exact-overlap"
//!
//! [alternatives]
//! max_results = 4
//! max_hour_offset = 3
//! respect_business_hours = true
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::availability::{BookedSlotRule, BusinessHoursPolicy};
use crate::calendar::{HolidayCalendar, HolidayDefinition};
use crate::conflict::AlternativeSlotFinder;
use crate::error::{Result, ScheduleError};
use crate::models::{AddOnCatalog, AvailabilityBlock, BusinessHoursOverride, OpeningHours, WeeklyHours};

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default weekly opening table.
    pub weekly_hours: WeeklyHours,
    /// Window used when a normally-closed weekday is forced open.
    pub fallback_hours: OpeningHours,
    /// Per-date exceptions, keyed by ISO date.
    pub overrides: BTreeMap<NaiveDate, BusinessHoursOverride>,
    /// Admin open/closed blocks.
    pub blocks: Vec<AvailabilityBlock>,
    /// Add-on catalog.
    pub add_ons: AddOnCatalog,
    /// Holiday settings.
    pub holidays: HolidaySettings,
    /// Slot generation settings.
    pub slots: SlotSettings,
    /// Alternative search settings.
    pub alternatives: AlternativeSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weekly_hours: WeeklyHours::default(),
            fallback_hours: OpeningHours::default(),
            overrides: BTreeMap::new(),
            blocks: Vec::new(),
            add_ons: AddOnCatalog::standard(),
            holidays: HolidaySettings::default(),
            slots: SlotSettings::default(),
            alternatives: AlternativeSettings::default(),
        }
    }
}

/// Holiday calendar settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HolidaySettings {
    /// Include the standard US practice holidays.
    pub use_standard: bool,
    /// Additional practice-specific holidays.
    pub extra: Vec<HolidayDefinition>,
}

impl Default for HolidaySettings {
    fn default() -> Self {
        Self {
            use_standard: true,
            extra: Vec::new(),
        }
    }
}

impl HolidaySettings {
    /// Builds the holiday calendar.
    pub fn calendar(&self) -> HolidayCalendar {
        let mut calendar = if self.use_standard {
            HolidayCalendar::us_practice()
        } else {
            HolidayCalendar::empty()
        };
        calendar.extend(self.extra.iter().cloned());
        calendar
    }
}

/// Slot generation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotSettings {
    /// How existing bookings remove generated slots.
    pub booked_slot_rule: BookedSlotRule,
}

/// Alternative search settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlternativeSettings {
    /// Maximum suggestions returned.
    pub max_results: usize,
    /// Hours searched on each side of the conflicting start.
    pub max_hour_offset: u32,
    /// Drop suggestions that do not fit within business hours.
    pub respect_business_hours: bool,
}

impl Default for AlternativeSettings {
    fn default() -> Self {
        let finder = AlternativeSlotFinder::default();
        Self {
            max_results: finder.max_results,
            max_hour_offset: finder.max_hour_offset,
            respect_business_hours: true,
        }
    }
}

impl AlternativeSettings {
    /// Builds the finder.
    pub fn finder(&self) -> AlternativeSlotFinder {
        AlternativeSlotFinder::new()
            .with_max_results(self.max_results)
            .with_max_hour_offset(self.max_hour_offset)
    }
}

impl EngineConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ScheduleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(
            path = %path.display(),
            overrides = config.overrides.len(),
            blocks = config.blocks.len(),
            add_ons = config.add_ons.len(),
            "loaded engine config"
        );
        Ok(config)
    }

    /// Builds the business-hours policy described by this configuration.
    pub fn policy(&self) -> BusinessHoursPolicy {
        let mut policy = BusinessHoursPolicy::new(self.weekly_hours.clone())
            .with_fallback(self.fallback_hours)
            .with_holidays(self.holidays.calendar());
        for (date, over) in &self.overrides {
            policy.add_override(*date, *over);
        }
        policy
    }
}
