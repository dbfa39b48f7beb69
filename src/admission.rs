//! Admission
//!
//! Checks a caller runs before adding an item to the cart. The cart itself accepts anything;
//! keeping it to one restaurant and to orderable dishes is the caller's decision.

use thiserror::Error;

use crate::{
    cart::Cart,
    menu::{MenuItem, MenuItemId, RestaurantId},
};

/// Reasons an item may not be added to the cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdmissionError {
    /// The item is not currently available.
    #[error("{0} is currently unavailable")]
    Unavailable(MenuItemId),

    /// The cart already holds dishes from another restaurant.
    #[error(
        "the cart holds items from restaurant {cart}; clear it to order from restaurant {item}"
    )]
    DifferentRestaurant {
        /// Restaurant already in the cart
        cart: RestaurantId,

        /// Restaurant of the rejected item
        item: RestaurantId,
    },
}

/// Check that `item` may be added to `cart`.
///
/// # Errors
///
/// - [`AdmissionError::Unavailable`]: the item is not available.
/// - [`AdmissionError::DifferentRestaurant`]: the cart is non-empty and belongs to another
///   restaurant.
pub fn admit(cart: &Cart, item: &MenuItem) -> Result<(), AdmissionError> {
    if !item.is_available {
        return Err(AdmissionError::Unavailable(item.id.clone()));
    }

    match cart.restaurant_id() {
        Some(current) if *current != item.restaurant_id => {
            Err(AdmissionError::DifferentRestaurant {
                cart: current.clone(),
                item: item.restaurant_id.clone(),
            })
        }
        _ => Ok(()),
    }
}
