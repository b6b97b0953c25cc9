//! Booking domain models.
//!
//! Plain data consumed and produced by the availability engine. Every
//! type is a read-only value; the caller owns persistence.
//!
//! # Domain Mappings
//!
//! | u-booking | Practice admin |
//! |-----------|----------------|
//! | Booking | Client appointment |
//! | WeeklyHours | Default opening hours |
//! | BusinessHoursOverride | Irregular day (opened holiday, custom hours) |
//! | AvailabilityBlock | Admin open/closed block |
//! | AddOn | Session extra (reflexology, aromatherapy) |

mod add_on;
mod booking;
mod hours;
mod slot;
pub mod time;

pub use add_on::{AddOn, AddOnCatalog, AddOnSelection};
pub use booking::{Booking, BookingStatus};
pub use hours::{AvailabilityBlock, BusinessHoursOverride, DayHours, OpeningHours, WeeklyHours};
#[cfg(test)]
pub(crate) use hours::clock;
pub use slot::{Slot, SuggestedSlot};
pub use time::{hhmm, TimeRange};
