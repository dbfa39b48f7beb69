//! Cart Store
//!
//! Keeps the [`Cart`] in memory and mirrors every change to a [`CartStorage`] backend.
//! Persistence is best-effort: failing reads start an empty cart, failing writes are logged
//! and the in-memory cart stays authoritative for the rest of the session.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::{
    cart::{Cart, CartError, CartLine, LineKey},
    menu::{MenuItem, MenuItemId, RestaurantId},
    storage::CartStorage,
};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "cart-items";

/// How the initial cart was obtained when the store opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A stored cart was found and adopted.
    Restored,

    /// Nothing was stored under the key.
    Empty,

    /// A payload was stored but could not be parsed; it has been replaced by an empty cart.
    Recovered,

    /// The backend could not be read; the store runs memory-only until a write succeeds.
    Unreadable,
}

/// Cart state container with write-through persistence.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    cart: Cart,
    storage: S,
    key: String,
    outcome: LoadOutcome,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the store under [`DEFAULT_STORAGE_KEY`].
    pub fn open(storage: S) -> Self {
        Self::open_with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Open the store, restoring the cart stored under `key`.
    ///
    /// Never fails: a missing, unreadable or corrupt payload yields an empty cart.
    pub fn open_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();

        let (cart, outcome) = match storage.read(&key) {
            Ok(Some(payload)) => match decode(&payload) {
                Some(cart) => {
                    info!(key = %key, lines = cart.len(), "restored cart");

                    (cart, LoadOutcome::Restored)
                }
                None => {
                    warn!(key = %key, "stored cart is corrupt, starting with an empty cart");

                    (Cart::new(), LoadOutcome::Recovered)
                }
            },
            Ok(None) => (Cart::new(), LoadOutcome::Empty),
            Err(error) => {
                warn!(key = %key, %error, "failed to read stored cart, starting with an empty cart");

                (Cart::new(), LoadOutcome::Unreadable)
            }
        };

        let mut store = Self {
            cart,
            storage,
            key,
            outcome,
        };

        if outcome == LoadOutcome::Recovered {
            store.flush();
        }

        store
    }

    /// Add `quantity` of `item`, merging into an existing line with the same instructions.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if `quantity` is zero and
    /// [`CartError::TotalOverflow`] if the cart total would overflow; nothing is changed or
    /// written.
    pub fn add_item(
        &mut self,
        item: MenuItem,
        quantity: u32,
        special_instructions: Option<&str>,
    ) -> Result<(), CartError> {
        debug!(item = %item.id, quantity, "adding item");

        self.cart.add_item(item, quantity, special_instructions)?;
        self.flush();

        Ok(())
    }

    /// Remove every line for `menu_item_id`.
    pub fn remove_item(&mut self, menu_item_id: &MenuItemId) {
        debug!(item = %menu_item_id, "removing item");

        self.cart.remove_item(menu_item_id);
        self.flush();
    }

    /// Set the quantity of every line for `menu_item_id`; zero removes them.
    ///
    /// A quantity that would overflow the cart total is logged and ignored.
    pub fn update_quantity(&mut self, menu_item_id: &MenuItemId, quantity: u32) {
        debug!(item = %menu_item_id, quantity, "updating quantity");

        match self.cart.update_quantity(menu_item_id, quantity) {
            Ok(()) => self.flush(),
            Err(error) => warn!(%error, "quantity update ignored"),
        }
    }

    /// Remove the single line matching `key`.
    pub fn remove_line(&mut self, key: &LineKey) {
        debug!(item = %key.menu_item_id, "removing line");

        self.cart.remove_line(key);
        self.flush();
    }

    /// Set the quantity of the single line matching `key`; zero removes it.
    ///
    /// A quantity that would overflow the cart total is logged and ignored.
    pub fn set_line_quantity(&mut self, key: &LineKey, quantity: u32) {
        debug!(item = %key.menu_item_id, quantity, "setting line quantity");

        match self.cart.set_line_quantity(key, quantity) {
            Ok(()) => self.flush(),
            Err(error) => warn!(%error, "quantity update ignored"),
        }
    }

    /// Empty the cart. The stored entry is kept, holding an empty list.
    pub fn clear_cart(&mut self) {
        debug!("clearing cart");

        self.cart.clear();
        self.flush();
    }

    /// Total number of dishes.
    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    /// Unrounded cart subtotal.
    pub fn total_price(&self) -> Decimal {
        self.cart.total_price()
    }

    /// Restaurant the cart currently belongs to.
    pub fn restaurant_id(&self) -> Option<&RestaurantId> {
        self.cart.restaurant_id()
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// Current cart state.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// How the cart was obtained when the store opened.
    pub fn load_outcome(&self) -> LoadOutcome {
        self.outcome
    }

    /// Storage key the cart is written under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Close the store and hand back the storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn flush(&mut self) {
        let payload = match serde_json::to_string(&self.cart) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(key = %self.key, %error, "failed to encode cart");

                return;
            }
        };

        if let Err(error) = self.storage.write(&self.key, &payload) {
            warn!(key = %self.key, %error, "failed to persist cart, keeping it in memory");
        }
    }
}

/// Parse a stored payload. Anything [`Cart`] refuses to deserialize counts as corrupt.
fn decode(payload: &str) -> Option<Cart> {
    serde_json::from_str(payload)
        .inspect_err(|error| debug!(%error, "failed to decode stored cart"))
        .ok()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::storage::{DisabledStorage, MemoryStorage};

    fn jollof() -> MenuItem {
        MenuItem::new("m-1", "Jollof Rice", Decimal::new(1000, 2), "r-1")
    }

    #[test]
    fn opens_empty_when_nothing_is_stored() {
        let store = CartStore::open(MemoryStorage::new());

        assert!(store.cart().is_empty());
        assert_eq!(store.load_outcome(), LoadOutcome::Empty);
        assert_eq!(store.key(), DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn every_mutation_is_written_through() -> TestResult {
        let mut store = CartStore::open(MemoryStorage::new());

        store.add_item(jollof(), 2, Some("no onions"))?;

        let storage = store.into_storage();
        let stored = storage.get(DEFAULT_STORAGE_KEY).unwrap_or_default();

        assert!(stored.contains(r#""quantity":2"#), "stored: {stored}");
        assert!(
            stored.contains(r#""specialInstructions":"no onions""#),
            "stored: {stored}"
        );
        assert!(stored.contains(r#""menuItem":{"#), "stored: {stored}");

        Ok(())
    }

    #[test]
    fn clear_writes_an_empty_list() -> TestResult {
        let mut store = CartStore::open(MemoryStorage::new());

        store.add_item(jollof(), 1, None)?;
        store.clear_cart();

        assert_eq!(store.into_storage().get(DEFAULT_STORAGE_KEY), Some("[]"));

        Ok(())
    }

    #[test]
    fn zero_quantity_add_is_not_written() {
        let mut store = CartStore::open(MemoryStorage::new());

        let result = store.add_item(jollof(), 0, None);

        assert!(result.is_err());
        assert_eq!(store.into_storage().get(DEFAULT_STORAGE_KEY), None);
    }

    #[test]
    fn corrupt_payload_is_replaced() {
        let store = CartStore::open(MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, "{not json"));

        assert!(store.cart().is_empty());
        assert_eq!(store.load_outcome(), LoadOutcome::Recovered);
        assert_eq!(store.into_storage().get(DEFAULT_STORAGE_KEY), Some("[]"));
    }

    #[test]
    fn stored_zero_quantity_counts_as_corrupt() -> TestResult {
        let mut line = serde_json::to_value(CartLine {
            menu_item: jollof(),
            quantity: 1,
            special_instructions: None,
        })?;
        line["quantity"] = serde_json::json!(0);
        let payload = serde_json::to_string(&[line])?;

        let store = CartStore::open(MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, payload));

        assert!(store.cart().is_empty());
        assert_eq!(store.load_outcome(), LoadOutcome::Recovered);

        Ok(())
    }

    fn stored_line(price: &str, quantity: u32) -> String {
        format!(
            r#"[{{"menuItem":{{"id":"m-1","name":"Jollof Rice","price":"{price}","restaurantId":"r-1"}},"quantity":{quantity}}}]"#
        )
    }

    #[test]
    fn stored_total_that_overflows_counts_as_corrupt() {
        let payload = stored_line("79228162514264337593543950335", 2);

        let store = CartStore::open(MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, payload));

        assert_eq!(store.load_outcome(), LoadOutcome::Recovered);
        assert_eq!(store.total_price(), Decimal::ZERO);
        assert_eq!(store.into_storage().get(DEFAULT_STORAGE_KEY), Some("[]"));
    }

    #[test]
    fn stored_payload_of_the_wrong_shape_counts_as_corrupt() {
        let payloads = [
            r#"{"items":[]}"#,
            r#"[{"quantity":1}]"#,
            r#"[{"menuItem":{"id":"m-1"},"quantity":1}]"#,
            r#"[{"menuItem":{"id":"m-1","name":"Jollof Rice","price":"10.00","restaurantId":"r-1"},"quantity":-1}]"#,
            "null",
        ];

        for payload in payloads {
            let store = CartStore::open(MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, payload));

            assert_eq!(store.load_outcome(), LoadOutcome::Recovered, "{payload}");
            assert!(store.cart().is_empty(), "{payload}");
        }
    }

    #[test]
    fn stored_blank_notes_and_duplicates_are_merged() -> TestResult {
        let payload = r#"[
            {"menuItem":{"id":"m-1","name":"Jollof Rice","price":"10.00","restaurantId":"r-1"},"quantity":1,"specialInstructions":"  "},
            {"menuItem":{"id":"m-1","name":"Jollof Rice","price":"10.00","restaurantId":"r-1"},"quantity":2}
        ]"#;

        let mut store = CartStore::open(MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, payload));

        assert_eq!(store.load_outcome(), LoadOutcome::Restored);

        store.add_item(jollof(), 1, None)?;

        assert_eq!(store.lines().len(), 1);
        assert_eq!(store.total_items(), 4);

        Ok(())
    }

    #[test]
    fn overflowing_quantity_updates_are_ignored() -> TestResult {
        let huge = MenuItem::new("m-9", "Banquet", Decimal::MAX, "r-1");
        let mut store = CartStore::open(MemoryStorage::new());

        store.add_item(huge.clone(), 1, None)?;

        assert!(store.add_item(huge, 1, None).is_err());

        store.update_quantity(&MenuItemId::new("m-9"), 2);
        store.set_line_quantity(&LineKey::new("m-9", None), 3);

        assert_eq!(store.total_items(), 1);
        assert_eq!(store.total_price(), Decimal::MAX);

        let reopened = CartStore::open(store.into_storage());

        assert_eq!(reopened.load_outcome(), LoadOutcome::Restored);
        assert_eq!(reopened.total_items(), 1);

        Ok(())
    }

    #[test]
    fn disabled_storage_keeps_working_in_memory() -> TestResult {
        let mut store = CartStore::open(DisabledStorage);

        assert_eq!(store.load_outcome(), LoadOutcome::Unreadable);

        store.add_item(jollof(), 2, None)?;
        store.update_quantity(&MenuItemId::new("m-1"), 3);

        assert_eq!(store.total_items(), 3);
        assert_eq!(store.total_price(), Decimal::new(3000, 2));

        Ok(())
    }

    #[test]
    fn custom_key_is_used() -> TestResult {
        let mut store = CartStore::open_with_key(MemoryStorage::new(), "guest-cart");

        store.add_item(jollof(), 1, None)?;

        let storage = store.into_storage();

        assert!(storage.get("guest-cart").is_some());
        assert!(storage.get(DEFAULT_STORAGE_KEY).is_none());

        Ok(())
    }
}
