//! Cart summary
//!
//! Renders the cart and its checkout quote as a table for terminal output.

use std::io;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{cart::Cart, checkout::Quote};

/// Errors that can occur when writing a cart summary.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// An amount is too large to express in minor units.
    #[error("amount {0} cannot be displayed")]
    Amount(Decimal),

    /// Writing to the output failed.
    #[error("failed to write summary: {0}")]
    Io(#[from] io::Error),
}

/// Look up a supported currency by ISO code.
pub fn currency_from_code(code: &str) -> Option<&'static Currency> {
    match code.trim().to_ascii_uppercase().as_str() {
        "GBP" => Some(iso::GBP),
        "USD" => Some(iso::USD),
        "EUR" => Some(iso::EUR),
        _ => None,
    }
}

/// Convert a decimal amount into money, rounded to minor units.
///
/// # Errors
///
/// Returns [`ReceiptError::Amount`] if the amount does not fit in minor units.
pub fn money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, ReceiptError> {
    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|value| value.to_i64())
        .ok_or(ReceiptError::Amount(amount))?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Write the cart lines followed by the quote totals.
///
/// # Errors
///
/// Returns an error if an amount cannot be displayed or the output cannot be written.
pub fn write_cart_summary(
    mut out: impl io::Write,
    cart: &Cart,
    quote: &Quote,
    currency: &'static Currency,
) -> Result<(), ReceiptError> {
    if cart.is_empty() {
        writeln!(out, "Your cart is empty")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Notes", "Price", "Qty", "Total"]);

    for (idx, line) in cart.iter().enumerate() {
        builder.push_record([
            format!("#{:<3}", idx + 1),
            line.menu_item.name.clone(),
            line.special_instructions.clone().unwrap_or_default(),
            money(line.menu_item.price, currency)?.to_string(),
            line.quantity.to_string(),
            money(line.line_total(), currency)?.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Alignment::center());
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "{table}")?;

    let rows = [
        ("Items:", cart.total_items().to_string()),
        ("Subtotal:", money(quote.subtotal, currency)?.to_string()),
        ("Delivery:", money(quote.delivery_fee, currency)?.to_string()),
        ("Tax:", money(quote.tax, currency)?.to_string()),
        ("Total:", money(quote.total, currency)?.to_string()),
    ];

    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in rows {
        writeln!(out, " {label:<10}{value:>value_width$}")?;
    }

    Ok(())
}
