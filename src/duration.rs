//! Session duration adjustment.
//!
//! Selected add-ons may lengthen a session. The adjusted duration is the
//! base length plus the extension of every selected add-on found in the
//! catalog; ids missing from the catalog contribute nothing.

use crate::models::{AddOnCatalog, AddOnSelection};

/// Base duration plus the extensions of the selected add-ons.
///
/// ```
/// use u_booking::duration::adjusted_duration;
/// use u_booking::models::{AddOnCatalog, AddOnSelection};
///
/// let catalog = AddOnCatalog::standard();
/// let reflexology = AddOnSelection::new().with("reflexology");
/// assert_eq!(adjusted_duration(60, &reflexology, &catalog), 75);
/// assert_eq!(adjusted_duration(60, &AddOnSelection::new(), &catalog), 60);
/// ```
pub fn adjusted_duration(base_minutes: u32, selection: &AddOnSelection, catalog: &AddOnCatalog) -> u32 {
    selection
        .ids()
        .filter_map(|id| catalog.get(id))
        .fold(base_minutes, |total, add_on| {
            total.saturating_add(add_on.duration_extension_minutes)
        })
}

/// Total price of the selected add-ons, in cents.
pub fn additional_price_cents(selection: &AddOnSelection, catalog: &AddOnCatalog) -> u32 {
    selection
        .ids()
        .filter_map(|id| catalog.get(id))
        .fold(0u32, |total, add_on| total.saturating_add(add_on.price_cents))
}
