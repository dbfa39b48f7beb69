//! Catalog listings
//!
//! Renders restaurant listings and category menus as tables for terminal output.

use std::io;

use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};

use crate::{
    catalog::{MenuSection, Restaurant},
    checkout::receipt::{ReceiptError, money},
};

/// Write one row per restaurant with its cuisine, fees, and opening state.
///
/// # Errors
///
/// Returns an error if an amount cannot be displayed or the output cannot be written.
pub fn write_restaurants(
    mut out: impl io::Write,
    restaurants: &[&Restaurant],
    currency: &'static Currency,
) -> Result<(), ReceiptError> {
    if restaurants.is_empty() {
        writeln!(out, "No restaurants found")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["Id", "Restaurant", "Cuisine", "Delivery", "Minimum", "Status"]);

    for restaurant in restaurants {
        builder.push_record([
            restaurant.id.to_string(),
            restaurant.name.clone(),
            restaurant.cuisine.clone(),
            money(restaurant.delivery_fee, currency)?.to_string(),
            money(restaurant.minimum_order, currency)?.to_string(),
            if restaurant.is_open { "Open" } else { "Closed" }.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Alignment::center());
    table.modify(Columns::new(3..5), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

/// Write a restaurant's heading followed by a table per menu category.
///
/// # Errors
///
/// Returns an error if an amount cannot be displayed or the output cannot be written.
pub fn write_menu(
    mut out: impl io::Write,
    restaurant: &Restaurant,
    sections: &[MenuSection<'_>],
    currency: &'static Currency,
) -> Result<(), ReceiptError> {
    writeln!(out, "{}", restaurant.name)?;

    if !restaurant.description.is_empty() {
        writeln!(out, "{}", restaurant.description)?;
    }

    if !restaurant.is_open {
        writeln!(out, "Currently closed")?;
    }

    if sections.is_empty() {
        writeln!(out, "No menu items")?;

        return Ok(());
    }

    for section in sections {
        let mut builder = Builder::default();

        builder.push_record(["Id", "Item", "Price", ""]);

        for item in &section.items {
            builder.push_record([
                item.id.to_string(),
                item.name.clone(),
                money(item.price, currency)?.to_string(),
                if item.is_available { "" } else { "Unavailable" }.to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..3), Alignment::right());

        writeln!(out)?;
        writeln!(out, "{}", section.category)?;
        writeln!(out, "{table}")?;
    }

    Ok(())
}
