//! Cart
//!
//! The cart is an ordered list of [`CartLine`]s for a single restaurant. Lines keep their
//! insertion order, every line holds a quantity of at least one, and the cart total always
//! fits in a [`Decimal`].
//!
//! Adding merges on the dish *and* its instructions, while [`Cart::remove_item`] and
//! [`Cart::update_quantity`] address every variant of a dish by id. The keyed variants
//! [`Cart::remove_line`] and [`Cart::set_line_quantity`] touch a single variant.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::menu::{MenuItem, MenuItemId, RestaurantId};

mod line;

pub use line::{CartLine, LineKey};

use line::normalize_instructions;

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// An item was added with a quantity of zero.
    #[error("cannot add {0} with a quantity of zero")]
    ZeroQuantity(MenuItemId),

    /// The change would make the cart total too large to represent.
    #[error("cart total overflows when changing {0}")]
    TotalOverflow(MenuItemId),
}

/// Cart state
///
/// Serialises as a plain array of lines. Deserialising replays every line through
/// [`Cart::add_item`], so stored carts obey the same rules as carts built in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of `item` to the cart.
    ///
    /// When a line for the same item with the same instructions exists its quantity is
    /// increased, otherwise a new line is appended. The single-restaurant rule is not checked
    /// here; see [`crate::admission::admit`].
    ///
    /// # Errors
    ///
    /// - [`CartError::ZeroQuantity`]: `quantity` is zero.
    /// - [`CartError::TotalOverflow`]: the cart total would no longer fit in a [`Decimal`].
    ///
    /// The cart is left unchanged on error.
    pub fn add_item(
        &mut self,
        item: MenuItem,
        quantity: u32,
        special_instructions: Option<&str>,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity(item.id));
        }

        let added = item.price.checked_mul(Decimal::from(quantity));

        if added
            .zip(self.checked_total_price())
            .and_then(|(added, total)| total.checked_add(added))
            .is_none()
        {
            return Err(CartError::TotalOverflow(item.id));
        }

        let special_instructions = normalize_instructions(special_instructions);

        let existing = self
            .lines
            .iter_mut()
            .find(|line| line.matches(&item.id, special_instructions.as_deref()));

        if let Some(line) = existing {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                menu_item: item,
                quantity,
                special_instructions,
            });
        }

        Ok(())
    }

    /// Remove every line for the given menu item, whatever its instructions.
    ///
    /// Removing an item that is not in the cart does nothing.
    pub fn remove_item(&mut self, menu_item_id: &MenuItemId) {
        self.lines.retain(|line| line.menu_item.id != *menu_item_id);
    }

    /// Set the quantity of every line for the given menu item.
    ///
    /// A quantity of zero removes the item, exactly as [`Cart::remove_item`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] if the new quantity would make the cart total
    /// unrepresentable. The cart is left unchanged.
    pub fn update_quantity(
        &mut self,
        menu_item_id: &MenuItemId,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            self.remove_item(menu_item_id);

            return Ok(());
        }

        self.checked_total_with(|line| {
            if line.menu_item.id == *menu_item_id {
                quantity
            } else {
                line.quantity
            }
        })
        .ok_or_else(|| CartError::TotalOverflow(menu_item_id.clone()))?;

        self.lines
            .iter_mut()
            .filter(|line| line.menu_item.id == *menu_item_id)
            .for_each(|line| line.quantity = quantity);

        Ok(())
    }

    /// Remove the single line matching `key`.
    pub fn remove_line(&mut self, key: &LineKey) {
        self.lines.retain(|line| {
            !line.matches(&key.menu_item_id, key.special_instructions.as_deref())
        });
    }

    /// Set the quantity of the single line matching `key`; zero removes it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] if the new quantity would make the cart total
    /// unrepresentable. The cart is left unchanged.
    pub fn set_line_quantity(&mut self, key: &LineKey, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            self.remove_line(key);

            return Ok(());
        }

        let is_target =
            |line: &CartLine| line.matches(&key.menu_item_id, key.special_instructions.as_deref());

        self.checked_total_with(|line| if is_target(line) { quantity } else { line.quantity })
            .ok_or_else(|| CartError::TotalOverflow(key.menu_item_id.clone()))?;

        if let Some(line) = self.lines.iter_mut().find(|line| is_target(&**line)) {
            line.quantity = quantity;
        }

        Ok(())
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total number of dishes across all lines.
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of unit price times quantity across all lines, unrounded.
    ///
    /// Mutations keep this representable; should it ever overflow it saturates at
    /// [`Decimal::MAX`] rather than panicking.
    pub fn total_price(&self) -> Decimal {
        self.checked_total_price().unwrap_or(Decimal::MAX)
    }

    /// Sum of unit price times quantity, or `None` if it does not fit in a [`Decimal`].
    pub fn checked_total_price(&self) -> Option<Decimal> {
        self.checked_total_with(|line| line.quantity)
    }

    fn checked_total_with(&self, quantity_of: impl Fn(&CartLine) -> u32) -> Option<Decimal> {
        self.lines.iter().try_fold(Decimal::ZERO, |total, line| {
            line.menu_item
                .price
                .checked_mul(Decimal::from(quantity_of(line)))
                .and_then(|line_total| total.checked_add(line_total))
        })
    }

    /// Restaurant of the first line, or `None` for an empty cart.
    pub fn restaurant_id(&self) -> Option<&RestaurantId> {
        self.lines.first().map(|line| &line.menu_item.restaurant_id)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Number of lines (not dishes) in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Rebuild a cart from stored lines.
///
/// Blank notes are normalised and lines for the same dish and note are merged. Fails on a
/// zero quantity or a total that does not fit in a [`Decimal`].
impl TryFrom<Vec<CartLine>> for Cart {
    type Error = CartError;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        let mut cart = Self::new();

        for CartLine {
            menu_item,
            quantity,
            special_instructions,
        } in lines
        {
            cart.add_item(menu_item, quantity, special_instructions.as_deref())?;
        }

        Ok(cart)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
