//! Availability and scheduling engine for a single-practitioner practice.
//!
//! Decides which appointment slots are bookable on any date, detects
//! overlaps when add-ons lengthen a session, and proposes nearby
//! alternatives when a requested time conflicts. Every operation is a
//! pure function of its inputs: the caller supplies bookings, opening
//! hours, overrides, the add-on catalog, and `now`.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Booking`, `WeeklyHours`,
//!   `BusinessHoursOverride`, `AvailabilityBlock`, `AddOn`, `Slot`
//! - **`calendar`**: Fixed and floating holiday rules, `HolidayCalendar`
//! - **`availability`**: `BusinessHoursPolicy` and the lazy `SlotGenerator`
//! - **`conflict`**: `ConflictDetector` and `AlternativeSlotFinder`
//! - **`duration`**: Add-on duration adjustment
//! - **`engine`**: `SchedulingEngine` facade and `CapacityReport`
//! - **`config`**: TOML-loadable `EngineConfig`
//! - **`validation`**: Input integrity checks (duplicate IDs, overlapping blocks)
//!
//! # Time Model
//!
//! All values are local wall-clock time. Dates are ISO `YYYY-MM-DD` and
//! times `HH:MM` at the boundary (see [`models::time`]); internally they
//! are `chrono` naive types. Same-day intervals are half-open.

pub mod availability;
pub mod calendar;
pub mod config;
pub mod conflict;
pub mod duration;
pub mod engine;
pub mod error;
pub mod models;
pub mod validation;

pub use error::{Result, ScheduleError};
