//! Checkout
//!
//! Turns a finished cart into an order-creation request for the order service, and prices it
//! the way the checkout page shows it: subtotal, a flat delivery fee, and tax on the subtotal.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::Cart,
    menu::{MenuItemId, RestaurantId},
    storage::CartStorage,
    store::CartStore,
};

pub mod receipt;

/// Errors raised while checking out.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing in the cart to order.
    #[error("the cart is empty")]
    EmptyCart,

    /// No delivery address was given.
    #[error("a delivery address is required")]
    MissingAddress,

    /// An amount in the quote does not fit in a decimal.
    #[error("order total is too large to price")]
    AmountOverflow,

    /// The order service did not accept the order.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Errors reported by an [`OrderSubmission`] implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The service refused the order, with its message.
    #[error("order rejected: {0}")]
    Rejected(String),

    /// The service could not be reached.
    #[error("order service unavailable: {0}")]
    Unavailable(String),
}

/// Fees applied on top of the cart subtotal.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutPricing {
    /// Flat delivery fee
    pub delivery_fee: Decimal,

    /// Tax charged on the subtotal
    pub tax_rate: Percentage,
}

impl Default for CheckoutPricing {
    fn default() -> Self {
        Self {
            delivery_fee: Decimal::new(299, 2),
            tax_rate: Percentage::from(0.08),
        }
    }
}

/// Price breakdown of a cart at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// Sum of all cart lines
    pub subtotal: Decimal,

    /// Delivery fee
    pub delivery_fee: Decimal,

    /// Tax on the subtotal
    pub tax: Decimal,

    /// Amount payable
    pub total: Decimal,
}

impl Quote {
    /// Price `cart` with `pricing`. Values are exact; see [`Quote::rounded`].
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AmountOverflow`] if the subtotal, tax, or total overflows.
    pub fn for_cart(cart: &Cart, pricing: &CheckoutPricing) -> Result<Self, CheckoutError> {
        let subtotal = cart
            .checked_total_price()
            .ok_or(CheckoutError::AmountOverflow)?;

        let tax = (pricing.tax_rate * Decimal::ONE)
            .checked_mul(subtotal)
            .ok_or(CheckoutError::AmountOverflow)?;

        let total = subtotal
            .checked_add(pricing.delivery_fee)
            .and_then(|amount| amount.checked_add(tax))
            .ok_or(CheckoutError::AmountOverflow)?;

        Ok(Self {
            subtotal,
            delivery_fee: pricing.delivery_fee,
            tax,
            total,
        })
    }

    /// The same quote with every amount rounded to cents.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: to_cents(self.subtotal),
            delivery_fee: to_cents(self.delivery_fee),
            tax: to_cents(self.tax),
            total: to_cents(self.total),
        }
    }
}

fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// The signed-in customer placing the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Customer identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Contact email
    pub email: String,
}

/// Where and how to deliver the order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryDetails {
    /// Full delivery address
    pub address: String,

    /// Phone number for delivery updates
    pub phone: Option<String>,

    /// Notes for the restaurant or rider
    pub notes: Option<String>,
}

/// One line of an order-creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Menu item ordered
    pub menu_item_id: MenuItemId,

    /// Quantity ordered
    pub quantity: u32,

    /// Unit price at the time of ordering
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Customisation note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Body sent to the order service to create an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Customer placing the order
    pub customer_id: String,

    /// Restaurant the order is for
    pub restaurant_id: RestaurantId,

    /// Ordered lines, in cart order
    pub items: Vec<OrderItem>,

    /// Amount payable, rounded to cents
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,

    /// Delivery address
    pub delivery_address: String,

    /// Customer name
    pub name: String,

    /// Customer email
    pub email: String,

    /// Phone number for delivery updates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Notes for the restaurant or rider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// What the order service returns for a created order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacement {
    /// Created order identifier
    pub order_id: String,

    /// Payment reference
    pub reference: String,

    /// Where to send the customer to pay
    pub checkout_url: String,
}

/// The remote order service.
pub trait OrderSubmission {
    /// Create an order from `request`.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmissionError`] if the order could not be created.
    fn submit(&self, request: &CreateOrderRequest) -> Result<OrderPlacement, SubmissionError>;
}

/// Build the order-creation request for `cart`.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`]: the cart has no lines.
/// - [`CheckoutError::MissingAddress`]: the delivery address is blank.
/// - [`CheckoutError::AmountOverflow`]: the order total cannot be priced.
pub fn package_order(
    cart: &Cart,
    customer: &Customer,
    details: &DeliveryDetails,
    pricing: &CheckoutPricing,
) -> Result<CreateOrderRequest, CheckoutError> {
    let restaurant_id = cart.restaurant_id().ok_or(CheckoutError::EmptyCart)?;

    let address = details.address.trim();

    if address.is_empty() {
        return Err(CheckoutError::MissingAddress);
    }

    let items = cart
        .iter()
        .map(|line| OrderItem {
            menu_item_id: line.menu_item.id.clone(),
            quantity: line.quantity,
            price: line.menu_item.price,
            special_instructions: line.special_instructions.clone(),
        })
        .collect();

    Ok(CreateOrderRequest {
        customer_id: customer.id.clone(),
        restaurant_id: restaurant_id.clone(),
        items,
        total_amount: Quote::for_cart(cart, pricing)?.rounded().total,
        delivery_address: address.to_string(),
        name: customer.name.clone(),
        email: customer.email.clone(),
        phone: non_blank(details.phone.as_deref()),
        notes: non_blank(details.notes.as_deref()),
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Package the cart, submit it, and empty the cart once the order is created.
///
/// The cart is left untouched if packaging or submission fails.
///
/// # Errors
///
/// Returns a [`CheckoutError`] if the cart cannot be packaged or the service rejects it.
pub fn place_order<S, O>(
    store: &mut CartStore<S>,
    submission: &O,
    customer: &Customer,
    details: &DeliveryDetails,
    pricing: &CheckoutPricing,
) -> Result<OrderPlacement, CheckoutError>
where
    S: CartStorage,
    O: OrderSubmission + ?Sized,
{
    let request = package_order(store.cart(), customer, details, pricing)?;

    let placement = submission.submit(&request).inspect_err(|error| {
        warn!(%error, restaurant = %request.restaurant_id, "order submission failed");
    })?;

    info!(
        order = %placement.order_id,
        reference = %placement.reference,
        "order placed"
    );

    store.clear_cart();

    Ok(placement)
}
