//! Catalog
//!
//! Restaurants and their menus loaded from a YAML document, standing in for the restaurant
//! catalog service.
//!
//! ```yaml
//! restaurants:
//!   mama-put:
//!     name: Mama Put
//!     cuisine: Nigerian
//!     description: Home-style rice and stews
//!     delivery_fee: "2.99"
//!     minimum_order: "10.00"
//!     items:
//!       jollof:
//!         name: Jollof Rice
//!         price: "10.00"
//!         category: Mains
//!       suya:
//!         name: Suya
//!         price: "4.50"
//!         available: false
//! ```

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::menu::{MenuItem, MenuItemId, RestaurantId};

pub mod listing;

/// Section heading for menu items without a category.
pub const UNCATEGORISED: &str = "Other";

/// Catalog loading and lookup errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Price that is not a non-negative decimal amount
    #[error("Invalid price for {0}: {1}")]
    InvalidPrice(MenuItemId, String),

    /// Delivery fee or minimum order that is not a non-negative decimal amount
    #[error("Invalid amount for restaurant {0}: {1}")]
    InvalidAmount(RestaurantId, String),

    /// The same item id appears under two restaurants
    #[error("Menu item {0} is listed more than once")]
    DuplicateItem(MenuItemId),

    /// Unknown menu item
    #[error("Menu item not found: {0}")]
    ItemNotFound(MenuItemId),

    /// Unknown restaurant
    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(RestaurantId),
}

#[derive(Debug, Deserialize)]
struct CatalogFixture {
    restaurants: FxHashMap<String, RestaurantFixture>,
}

#[derive(Debug, Deserialize)]
struct RestaurantFixture {
    name: String,

    #[serde(default)]
    cuisine: String,

    #[serde(default)]
    description: String,

    #[serde(default)]
    address: Option<String>,

    #[serde(default)]
    delivery_time: Option<String>,

    /// Decimal amount (e.g., "2.99")
    #[serde(default)]
    delivery_fee: Option<String>,

    /// Decimal amount (e.g., "10.00")
    #[serde(default)]
    minimum_order: Option<String>,

    #[serde(default = "open_by_default")]
    open: bool,

    #[serde(default)]
    items: FxHashMap<String, ItemFixture>,
}

#[derive(Debug, Deserialize)]
struct ItemFixture {
    name: String,

    /// Decimal amount (e.g., "10.00")
    price: String,

    #[serde(default = "available_by_default")]
    available: bool,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    category: Option<String>,
}

fn available_by_default() -> bool {
    true
}

fn open_by_default() -> bool {
    true
}

/// Parse a decimal amount (e.g., "10.00"), rejecting negative values.
fn parse_amount(s: &str) -> Option<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .ok()
        .filter(|amount| !amount.is_sign_negative())
}

/// Parse a menu price (e.g., "10.00") into a non-negative decimal.
fn parse_price(id: &MenuItemId, s: &str) -> Result<Decimal, CatalogError> {
    parse_amount(s).ok_or_else(|| CatalogError::InvalidPrice(id.clone(), s.to_string()))
}

/// Parse an optional restaurant amount, defaulting to zero.
fn parse_restaurant_amount(id: &RestaurantId, s: Option<&str>) -> Result<Decimal, CatalogError> {
    s.map_or(Ok(Decimal::ZERO), |s| {
        parse_amount(s).ok_or_else(|| CatalogError::InvalidAmount(id.clone(), s.to_string()))
    })
}

/// A restaurant listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restaurant {
    /// Restaurant identifier
    pub id: RestaurantId,

    /// Display name
    pub name: String,

    /// Cuisine label (e.g., "Nigerian")
    pub cuisine: String,

    /// Short description
    pub description: String,

    /// Street address
    pub address: Option<String>,

    /// Estimated delivery time (e.g., "25-35 min")
    pub delivery_time: Option<String>,

    /// Fee the restaurant charges for delivery
    pub delivery_fee: Decimal,

    /// Smallest subtotal the restaurant accepts
    pub minimum_order: Decimal,

    /// Whether the restaurant is taking orders
    pub is_open: bool,
}

impl Restaurant {
    /// Returns true if the name, cuisine, or description contains `query`, ignoring case.
    ///
    /// A blank query matches every restaurant.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();

        query.is_empty()
            || [&self.name, &self.cuisine, &self.description]
                .iter()
                .any(|field| field.to_lowercase().contains(&query))
    }

    /// Returns true if the restaurant serves `cuisine`, ignoring case.
    pub fn serves(&self, cuisine: &str) -> bool {
        self.cuisine.eq_ignore_ascii_case(cuisine.trim())
    }
}

/// Restaurant listing filters; unset filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestaurantFilter {
    /// Text searched for in name, cuisine, and description
    pub search: Option<String>,

    /// Exact cuisine to keep
    pub cuisine: Option<String>,
}

impl RestaurantFilter {
    /// Returns true if `restaurant` passes every set filter.
    pub fn accepts(&self, restaurant: &Restaurant) -> bool {
        self.search
            .as_deref()
            .is_none_or(|query| restaurant.matches_search(query))
            && self
                .cuisine
                .as_deref()
                .is_none_or(|cuisine| restaurant.serves(cuisine))
    }
}

/// Items of one menu category.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuSection<'a> {
    /// Category name, or [`UNCATEGORISED`]
    pub category: &'a str,

    /// Items in the category, sorted by name
    pub items: Vec<&'a MenuItem>,
}

/// Restaurants and their menus.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    restaurants: FxHashMap<RestaurantId, Restaurant>,
    items: FxHashMap<MenuItemId, MenuItem>,
}

impl Catalog {
    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a catalog from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a price or restaurant amount is not a
    /// non-negative amount, or an item id is listed twice.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;
        let mut catalog = Self::default();

        for (restaurant_key, entry) in fixture.restaurants {
            let restaurant_id = RestaurantId::new(restaurant_key);

            for (item_key, item) in entry.items {
                let id = MenuItemId::new(item_key);

                let price = parse_price(&id, &item.price)?;

                let menu_item = MenuItem {
                    id: id.clone(),
                    name: item.name,
                    price,
                    restaurant_id: restaurant_id.clone(),
                    is_available: item.available,
                    description: item.description,
                    category: item.category,
                    image: None,
                };

                if catalog.items.insert(id.clone(), menu_item).is_some() {
                    return Err(CatalogError::DuplicateItem(id));
                }
            }

            let restaurant = Restaurant {
                delivery_fee: parse_restaurant_amount(
                    &restaurant_id,
                    entry.delivery_fee.as_deref(),
                )?,
                minimum_order: parse_restaurant_amount(
                    &restaurant_id,
                    entry.minimum_order.as_deref(),
                )?,
                id: restaurant_id.clone(),
                name: entry.name,
                cuisine: entry.cuisine,
                description: entry.description,
                address: entry.address,
                delivery_time: entry.delivery_time,
                is_open: entry.open,
            };

            catalog.restaurants.insert(restaurant_id, restaurant);
        }

        Ok(catalog)
    }

    /// Get a menu item by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ItemNotFound`] if the item is not in the catalog.
    pub fn item(&self, id: &MenuItemId) -> Result<&MenuItem, CatalogError> {
        self.items
            .get(id)
            .ok_or_else(|| CatalogError::ItemNotFound(id.clone()))
    }

    /// Get a restaurant by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::RestaurantNotFound`] if the restaurant is not in the catalog.
    pub fn restaurant(&self, id: &RestaurantId) -> Result<&Restaurant, CatalogError> {
        self.restaurants
            .get(id)
            .ok_or_else(|| CatalogError::RestaurantNotFound(id.clone()))
    }

    /// Every restaurant, sorted by name.
    pub fn restaurants(&self) -> Vec<&Restaurant> {
        self.find_restaurants(&RestaurantFilter::default())
    }

    /// Restaurants accepted by `filter`, sorted by name.
    pub fn find_restaurants(&self, filter: &RestaurantFilter) -> Vec<&Restaurant> {
        let mut restaurants: Vec<&Restaurant> = self
            .restaurants
            .values()
            .filter(|restaurant| filter.accepts(restaurant))
            .collect();

        restaurants.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        restaurants
    }

    /// Distinct non-blank cuisines, sorted.
    pub fn cuisines(&self) -> Vec<&str> {
        let mut cuisines: Vec<&str> = self
            .restaurants
            .values()
            .map(|restaurant| restaurant.cuisine.as_str())
            .filter(|cuisine| !cuisine.trim().is_empty())
            .collect();

        cuisines.sort_unstable();
        cuisines.dedup();

        cuisines
    }

    /// Menu of one restaurant, sorted by item name.
    pub fn menu(&self, restaurant_id: &RestaurantId) -> Vec<&MenuItem> {
        let mut menu: Vec<&MenuItem> = self
            .items
            .values()
            .filter(|item| item.restaurant_id == *restaurant_id)
            .collect();

        menu.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        menu
    }

    /// Menu of one restaurant grouped by category.
    ///
    /// Sections are sorted by category with [`UNCATEGORISED`] items last.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::RestaurantNotFound`] if the restaurant is not in the catalog.
    pub fn menu_sections(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<Vec<MenuSection<'_>>, CatalogError> {
        self.restaurant(restaurant_id)?;

        let mut sections: Vec<MenuSection<'_>> = Vec::new();
        let mut uncategorised = Vec::new();

        for item in self.menu(restaurant_id) {
            let Some(category) = item
                .category
                .as_deref()
                .map(str::trim)
                .filter(|category| !category.is_empty())
            else {
                uncategorised.push(item);
                continue;
            };

            match sections.iter_mut().find(|section| section.category == category) {
                Some(section) => section.items.push(item),
                None => sections.push(MenuSection {
                    category,
                    items: vec![item],
                }),
            }
        }

        sections.sort_by(|a, b| a.category.cmp(b.category));

        if !uncategorised.is_empty() {
            sections.push(MenuSection {
                category: UNCATEGORISED,
                items: uncategorised,
            });
        }

        Ok(sections)
    }

    /// Number of menu items across all restaurants.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
