//! Add-on catalog model.
//!
//! Add-ons are optional extras a client attaches to a session. Only their
//! duration extension matters for availability; prices are carried so the
//! caller can total a request from the same catalog value.

use serde::{Deserialize, Serialize};

/// An optional session extra.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddOn {
    /// Stable identifier (e.g., "reflexology").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Price added to the session, in cents.
    #[serde(default)]
    pub price_cents: u32,
    /// Minutes added to the session length.
    #[serde(default)]
    pub duration_extension_minutes: u32,
}

impl AddOn {
    /// Creates an add-on with no price and no extension.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price_cents: 0,
            duration_extension_minutes: 0,
        }
    }

    /// Sets the price in cents.
    pub fn with_price_cents(mut self, price_cents: u32) -> Self {
        self.price_cents = price_cents;
        self
    }

    /// Sets the duration extension.
    pub fn with_extension(mut self, minutes: u32) -> Self {
        self.duration_extension_minutes = minutes;
        self
    }
}

/// The add-on catalog, passed explicitly to every computation that needs it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AddOnCatalog {
    items: Vec<AddOn>,
}

impl AddOnCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The practice's standard menu. Reflexology is the only add-on that
    /// lengthens a session.
    pub fn standard() -> Self {
        Self::new()
            .with_add_on(
                AddOn::new("reflexology", "Reflexology")
                    .with_price_cents(2_000)
                    .with_extension(15),
            )
            .with_add_on(AddOn::new("aromatherapy", "Aromatherapy").with_price_cents(1_000))
            .with_add_on(AddOn::new("hot-stones", "Hot Stones").with_price_cents(1_500))
            .with_add_on(AddOn::new("cupping", "Cupping").with_price_cents(1_500))
            .with_add_on(AddOn::new("scalp-massage", "Scalp Massage").with_price_cents(1_000))
    }

    /// Adds an add-on to the catalog.
    pub fn with_add_on(mut self, add_on: AddOn) -> Self {
        self.items.push(add_on);
        self
    }

    /// Looks up an add-on by id.
    pub fn get(&self, id: &str) -> Option<&AddOn> {
        self.items.iter().find(|a| a.id == id)
    }

    /// All add-ons, in catalog order.
    pub fn items(&self) -> &[AddOn] {
        &self.items
    }

    /// Number of add-ons.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Add-ons selected for one booking request.
///
/// Ids are kept unique and in selection order; selecting the same add-on
/// twice has no further effect.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct AddOnSelection {
    ids: Vec<String>,
}

impl AddOnSelection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an add-on id.
    pub fn with(mut self, id: impl Into<String>) -> Self {
        self.select(id);
        self
    }

    /// Adds an add-on id in place.
    pub fn select(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    /// Selected ids.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AddOnSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Self::new();
        for id in iter {
            selection.select(id);
        }
        selection
    }
}

impl From<Vec<String>> for AddOnSelection {
    fn from(ids: Vec<String>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<AddOnSelection> for Vec<String> {
    fn from(selection: AddOnSelection) -> Self {
        selection.ids
    }
}
