//! Conflict detection and alternative suggestions.
//!
//! Conflicts are reported as data, never as errors: the caller decides
//! whether an overlap blocks a booking or is accepted anyway.

mod alternatives;
mod detector;

pub use alternatives::AlternativeSlotFinder;
pub use detector::ConflictDetector;
