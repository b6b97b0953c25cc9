//! Scheduling engine and capacity reporting.
//!
//! [`SchedulingEngine`] binds a practice configuration to the individual
//! components and runs the booking flow: duration adjustment, conflict
//! detection, and alternative search. [`CapacityReport`] counts open slots
//! over a range for reporting.

mod capacity;
mod scheduling;

pub use capacity::CapacityReport;
pub use scheduling::{BookingEvaluation, BookingRequest, SchedulingEngine};
