//! Cart Lines

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::menu::{MenuItem, MenuItemId};

/// A dish in the cart, with its quantity and optional customisation note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Full menu item record, embedded so the cart survives catalog changes
    pub menu_item: MenuItem,

    /// Quantity ordered, always at least one
    pub quantity: u32,

    /// Customisation note for the kitchen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

impl CartLine {
    /// Returns the merge key of this line.
    pub fn key(&self) -> LineKey {
        LineKey {
            menu_item_id: self.menu_item.id.clone(),
            special_instructions: self.special_instructions.clone(),
        }
    }

    /// Returns true if this line has the given menu item and instructions.
    pub fn matches(&self, menu_item_id: &MenuItemId, special_instructions: Option<&str>) -> bool {
        self.menu_item.id == *menu_item_id
            && self.special_instructions.as_deref() == special_instructions
    }

    /// Unit price multiplied by quantity, saturating at [`Decimal::MAX`].
    pub fn line_total(&self) -> Decimal {
        self.checked_line_total().unwrap_or(Decimal::MAX)
    }

    /// Unit price multiplied by quantity, or `None` if it does not fit in a [`Decimal`].
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.menu_item.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Identifies one variant of a dish in the cart.
///
/// The same dish with different instructions is a different line; two absent notes are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    /// Menu item identifier
    pub menu_item_id: MenuItemId,

    /// Customisation note, if any
    pub special_instructions: Option<String>,
}

impl LineKey {
    /// Create a new line key.
    pub fn new(menu_item_id: impl Into<MenuItemId>, special_instructions: Option<&str>) -> Self {
        Self {
            menu_item_id: menu_item_id.into(),
            special_instructions: normalize_instructions(special_instructions),
        }
    }
}

/// Blank notes are the same as no note at all.
pub(crate) fn normalize_instructions(special_instructions: Option<&str>) -> Option<String> {
    special_instructions
        .filter(|note| !note.trim().is_empty())
        .map(ToString::to_string)
}
