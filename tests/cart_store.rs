//! Integration tests for the cart store against memory and file backends.
//!
//! Dishes used throughout:
//!
//! - Jollof Rice (r-1): 10.00
//! - Fried Plantain (r-1): 5.50
//! - Amala (r-2): 8.00

use std::fs;

use rust_decimal::Decimal;
use testresult::TestResult;

use larder::{
    cart::LineKey,
    menu::{MenuItem, MenuItemId, RestaurantId},
    storage::{CartStorage, FileStorage, MemoryStorage},
    store::{CartStore, DEFAULT_STORAGE_KEY, LoadOutcome},
};

fn jollof() -> MenuItem {
    MenuItem::new("m-1", "Jollof Rice", Decimal::new(1000, 2), "r-1")
}

fn plantain() -> MenuItem {
    MenuItem::new("m-2", "Fried Plantain", Decimal::new(550, 2), "r-1")
}

fn amala() -> MenuItem {
    MenuItem::new("m-3", "Amala", Decimal::new(800, 2), "r-2")
}

fn has_distinct_keys<S: CartStorage>(store: &CartStore<S>) -> bool {
    let keys: Vec<LineKey> = store.lines().iter().map(|line| line.key()).collect();

    keys.iter()
        .enumerate()
        .all(|(idx, key)| !keys.iter().skip(idx + 1).any(|other| other == key))
}

#[test]
fn adding_the_same_dish_twice_merges_lines() -> TestResult {
    let mut store = CartStore::open(MemoryStorage::new());

    store.add_item(jollof(), 1, Some("extra spicy"))?;
    store.add_item(jollof(), 2, Some("extra spicy"))?;

    assert_eq!(store.lines().len(), 1);
    assert_eq!(store.lines().first().map(|line| line.quantity), Some(3));

    Ok(())
}

#[test]
fn different_instructions_stay_on_separate_lines() -> TestResult {
    let mut store = CartStore::open(MemoryStorage::new());

    store.add_item(jollof(), 1, None)?;
    store.add_item(jollof(), 1, Some("no onions"))?;
    store.add_item(plantain(), 1, None)?;
    store.add_item(jollof(), 1, Some("no onions"))?;
    store.add_item(jollof(), 1, Some("   "))?;

    assert_eq!(store.lines().len(), 3);
    assert!(has_distinct_keys(&store));
    assert_eq!(store.total_items(), 5);

    Ok(())
}

#[test]
fn quantities_never_drop_to_zero() -> TestResult {
    let mut store = CartStore::open(MemoryStorage::new());

    store.add_item(jollof(), 2, None)?;
    store.add_item(plantain(), 1, None)?;

    store.update_quantity(&MenuItemId::new("m-1"), 0);

    assert!(store.add_item(plantain(), 0, None).is_err());
    assert_eq!(store.lines().len(), 1);
    assert!(store.lines().iter().all(|line| line.quantity > 0));

    Ok(())
}

#[test]
fn totals_follow_line_prices() -> TestResult {
    let mut store = CartStore::open(MemoryStorage::new());

    store.add_item(jollof(), 2, None)?;
    store.add_item(plantain(), 1, None)?;

    assert_eq!(store.total_price(), Decimal::new(2550, 2));
    assert_eq!(store.total_items(), 3);

    store.clear_cart();

    assert_eq!(store.total_price(), Decimal::ZERO);
    assert_eq!(store.total_items(), 0);

    Ok(())
}

#[test]
fn restaurant_follows_the_first_line() -> TestResult {
    let mut store = CartStore::open(MemoryStorage::new());

    assert_eq!(store.restaurant_id(), None);

    store.add_item(jollof(), 1, None)?;
    store.add_item(amala(), 1, None)?;

    assert_eq!(store.restaurant_id(), Some(&RestaurantId::new("r-1")));

    store.remove_item(&MenuItemId::new("m-1"));

    assert_eq!(store.restaurant_id(), Some(&RestaurantId::new("r-2")));

    Ok(())
}

#[test]
fn cart_survives_a_restart() -> TestResult {
    let dir = tempfile::tempdir()?;

    let mut store = CartStore::open(FileStorage::new(dir.path()));

    store.add_item(jollof(), 2, Some("no onions"))?;
    store.add_item(plantain(), 1, None)?;

    let before = store.cart().clone();

    drop(store);

    let reopened = CartStore::open(FileStorage::new(dir.path()));

    assert_eq!(reopened.load_outcome(), LoadOutcome::Restored);
    assert_eq!(reopened.cart(), &before);
    assert_eq!(reopened.total_price(), Decimal::new(2550, 2));

    Ok(())
}

#[test]
fn corrupt_payload_starts_an_empty_cart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::new(dir.path());
    let path = storage.entry_path(DEFAULT_STORAGE_KEY)?;

    fs::write(&path, "{not json")?;

    let mut store = CartStore::open(storage);

    assert_eq!(store.load_outcome(), LoadOutcome::Recovered);
    assert!(store.cart().is_empty());
    assert_eq!(fs::read_to_string(&path)?, "[]");

    store.add_item(jollof(), 1, None)?;

    assert_eq!(store.total_items(), 1);

    Ok(())
}

#[test]
fn zero_quantity_payload_is_treated_as_corrupt() -> TestResult {
    let payload = r#"[{"menuItem":{"id":"m-1","name":"Jollof Rice","price":10,"restaurantId":"r-1","isAvailable":true},"quantity":0}]"#;
    let mut storage = MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, payload);

    let store = CartStore::open(&mut storage);

    assert_eq!(store.load_outcome(), LoadOutcome::Recovered);
    assert!(store.cart().is_empty());

    drop(store);

    assert_eq!(storage.get(DEFAULT_STORAGE_KEY), Some("[]"));

    Ok(())
}

#[test]
fn removing_twice_is_the_same_as_once() -> TestResult {
    let mut store = CartStore::open(MemoryStorage::new());

    store.add_item(jollof(), 1, None)?;
    store.add_item(plantain(), 1, None)?;

    store.remove_item(&MenuItemId::new("m-1"));

    let once = store.cart().clone();

    store.remove_item(&MenuItemId::new("m-1"));
    store.remove_item(&MenuItemId::new("missing"));

    assert_eq!(store.cart(), &once);

    Ok(())
}

#[test]
fn keyed_edits_touch_one_line() -> TestResult {
    let mut store = CartStore::open(MemoryStorage::new());

    store.add_item(jollof(), 1, None)?;
    store.add_item(jollof(), 1, Some("no onions"))?;

    store.set_line_quantity(&LineKey::new("m-1", Some("no onions")), 4);
    store.remove_line(&LineKey::new("m-1", None));

    assert_eq!(store.lines().len(), 1);
    assert_eq!(store.total_items(), 4);

    Ok(())
}

#[test]
fn custom_keys_are_isolated() -> TestResult {
    let mut storage = MemoryStorage::new();

    let mut first = CartStore::open_with_key(&mut storage, "cart-a");

    first.add_item(jollof(), 1, None)?;

    drop(first);

    let second = CartStore::open_with_key(&mut storage, "cart-b");

    assert_eq!(second.load_outcome(), LoadOutcome::Empty);
    assert!(second.cart().is_empty());

    Ok(())
}
