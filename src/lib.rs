//! Larder
//!
//! Larder is the cart and checkout core of a food-ordering client: a persistent,
//! single-restaurant shopping cart with line merging, totals and crash-safe restore, plus the
//! checkout pricing and order tracking built on top of it.

pub mod admission;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod menu;
pub mod observability;
pub mod orders;
pub mod storage;
pub mod store;
