//! Business hours and slot generation.
//!
//! [`BusinessHoursPolicy`] decides whether a date is open and when;
//! [`SlotGenerator`] enumerates bookable starts from it, removing past
//! times, booked times, and admin-closed blocks.

mod policy;
mod slots;

pub use policy::{BusinessHoursPolicy, ClosureReason, HoursSource, ResolvedHours, SessionFit};
pub use slots::{BookedSlotRule, SlotGenerator, Slots};
