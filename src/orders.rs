//! Orders
//!
//! Order records as returned by the order service, and the status progression shown by the
//! order tracker.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{checkout::OrderItem, menu::RestaurantId};

/// Error returned for an unrecognised order status.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status: {0:?}")]
pub struct OrderStatusError(String);

/// Where an order is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation
    Pending,

    /// Accepted by the restaurant
    Confirmed,

    /// Being cooked
    Preparing,

    /// With the rider
    OutForDelivery,

    /// Handed to the customer
    Delivered,

    /// Called off
    Cancelled,
}

impl OrderStatus {
    /// Statuses an order moves through when it is not cancelled, in order.
    pub const PROGRESSION: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out-for-delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Customer-facing label.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Order Placed",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Returns true once the order can no longer change.
    pub fn is_final(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Tracker steps for this status, or `None` for a cancelled order.
    ///
    /// Every step up to and including the current one is completed.
    pub fn progress(self) -> Option<Vec<TrackerStep>> {
        let current = Self::PROGRESSION
            .iter()
            .position(|status| *status == self)?;

        Some(
            Self::PROGRESSION
                .iter()
                .enumerate()
                .map(|(idx, status)| TrackerStep {
                    status: *status,
                    completed: idx <= current,
                    current: idx == current,
                })
                .collect(),
        )
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "out-for-delivery" => Ok(OrderStatus::OutForDelivery),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            _ => Err(OrderStatusError(s.to_string())),
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = OrderStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One step of the order tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerStep {
    /// Status this step represents
    pub status: OrderStatus,

    /// Whether the order has reached this step
    pub completed: bool,

    /// Whether this is the order's current step
    pub current: bool,
}

/// Restaurant summary embedded in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRestaurant {
    /// Restaurant name
    pub name: String,
}

/// An order as listed in the customer's order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier
    pub id: String,

    /// Payment reference
    pub reference: String,

    /// Amount charged
    pub total_amount: Decimal,

    /// Payment state as reported by the payment provider
    pub payment_status: String,

    /// Fulfilment state
    pub status: OrderStatus,

    /// Delivery address
    pub delivery_address: String,

    /// Ordered lines
    #[serde(default)]
    pub items: Vec<OrderItem>,

    /// When the order was placed
    pub created_at: Timestamp,

    /// Restaurant the order came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<RestaurantId>,

    /// Restaurant summary, when the service includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<OrderRestaurant>,
}

impl Order {
    /// Number of dishes in the order.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// Sort orders newest first, as the order history shows them.
pub fn newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
