//! Menu

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu item identifier, as issued by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItemId(String);

impl MenuItemId {
    /// Create a new menu item identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MenuItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for MenuItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Restaurant identifier, as issued by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(String);

impl RestaurantId {
    /// Create a new restaurant identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RestaurantId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for RestaurantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A dish offered by a restaurant.
///
/// Menu items are produced by the catalog and only ever read by the cart. Unknown
/// fields in the catalog payload are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Menu item identifier
    pub id: MenuItemId,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: Decimal,

    /// Restaurant serving this item
    pub restaurant_id: RestaurantId,

    /// Whether the item can currently be ordered
    #[serde(alias = "available", default = "available_by_default")]
    pub is_available: bool,

    /// Optional longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional menu category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Optional image URL
    #[serde(default, alias = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

fn available_by_default() -> bool {
    true
}

impl MenuItem {
    /// Create a new, available menu item with no descriptive fields.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        restaurant_id: impl Into<String>,
    ) -> Self {
        Self {
            id: MenuItemId::new(id),
            name: name.into(),
            price,
            restaurant_id: RestaurantId::new(restaurant_id),
            is_available: true,
            description: None,
            category: None,
            image: None,
        }
    }

    /// Returns the same item marked as unavailable.
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.is_available = false;

        self
    }
}
