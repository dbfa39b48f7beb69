//! End-to-end ordering flow: pick dishes from the fixture catalog, guard admission, persist
//! the cart to disk, and place the order.

use std::cell::Cell;

use rust_decimal::Decimal;
use testresult::TestResult;

use larder::{
    admission::{self, AdmissionError},
    catalog::Catalog,
    checkout::{
        self, CheckoutError, CheckoutPricing, CreateOrderRequest, Customer, DeliveryDetails,
        OrderPlacement, OrderSubmission, SubmissionError,
    },
    menu::MenuItemId,
    storage::FileStorage,
    store::CartStore,
};

const CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/catalog.yml");

#[derive(Debug, Default)]
struct FakeOrderService {
    reject: bool,
    calls: Cell<u32>,
}

impl OrderSubmission for FakeOrderService {
    fn submit(&self, request: &CreateOrderRequest) -> Result<OrderPlacement, SubmissionError> {
        self.calls.set(self.calls.get() + 1);

        if self.reject {
            return Err(SubmissionError::Rejected("restaurant closed".to_string()));
        }

        Ok(OrderPlacement {
            order_id: format!("order-{}", request.restaurant_id),
            reference: "ref-1".to_string(),
            checkout_url: "https://pay.example/ref-1".to_string(),
        })
    }
}

fn customer() -> Customer {
    Customer {
        id: "c-1".to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
    }
}

fn details() -> DeliveryDetails {
    DeliveryDetails {
        address: " 1 Marina Road, Lagos ".to_string(),
        phone: Some("0800 000 0000".to_string()),
        notes: None,
    }
}

#[test]
fn orders_from_one_restaurant_and_clears_the_cart() -> TestResult {
    let catalog = Catalog::from_path(CATALOG)?;
    let dir = tempfile::tempdir()?;
    let mut store = CartStore::open(FileStorage::new(dir.path()));

    let jollof = catalog.item(&MenuItemId::new("jollof-rice"))?;
    let plantain = catalog.item(&MenuItemId::new("fried-plantain"))?;
    let amala = catalog.item(&MenuItemId::new("amala"))?;
    let chin_chin = catalog.item(&MenuItemId::new("chin-chin"))?;

    admission::admit(store.cart(), jollof)?;
    store.add_item(jollof.clone(), 2, None)?;

    admission::admit(store.cart(), plantain)?;
    store.add_item(plantain.clone(), 1, None)?;

    assert!(matches!(
        admission::admit(store.cart(), amala),
        Err(AdmissionError::DifferentRestaurant { .. })
    ));
    assert!(matches!(
        admission::admit(store.cart(), chin_chin),
        Err(AdmissionError::Unavailable(_))
    ));

    let request = checkout::package_order(
        store.cart(),
        &customer(),
        &details(),
        &CheckoutPricing::default(),
    )?;

    assert_eq!(request.restaurant_id.as_str(), "mama-put");
    assert_eq!(request.delivery_address, "1 Marina Road, Lagos");
    assert_eq!(request.items.len(), 2);
    assert_eq!(request.total_amount, Decimal::new(3053, 2));

    let service = FakeOrderService::default();

    let placement = checkout::place_order(
        &mut store,
        &service,
        &customer(),
        &details(),
        &CheckoutPricing::default(),
    )?;

    assert_eq!(placement.order_id, "order-mama-put");
    assert_eq!(service.calls.get(), 1);
    assert!(store.cart().is_empty());

    drop(store);

    let reopened = CartStore::open(FileStorage::new(dir.path()));

    assert!(reopened.cart().is_empty());

    Ok(())
}

#[test]
fn rejected_orders_keep_the_cart() -> TestResult {
    let catalog = Catalog::from_path(CATALOG)?;
    let dir = tempfile::tempdir()?;
    let mut store = CartStore::open(FileStorage::new(dir.path()));

    store.add_item(catalog.item(&MenuItemId::new("amala"))?.clone(), 1, None)?;

    let service = FakeOrderService {
        reject: true,
        ..FakeOrderService::default()
    };

    let result = checkout::place_order(
        &mut store,
        &service,
        &customer(),
        &details(),
        &CheckoutPricing::default(),
    );

    assert!(matches!(
        result,
        Err(CheckoutError::Submission(SubmissionError::Rejected(_)))
    ));
    assert_eq!(store.total_items(), 1);

    Ok(())
}

#[test]
fn empty_cart_is_never_submitted() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut store = CartStore::open(FileStorage::new(dir.path()));
    let service = FakeOrderService::default();

    let result = checkout::place_order(
        &mut store,
        &service,
        &customer(),
        &details(),
        &CheckoutPricing::default(),
    );

    assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    assert_eq!(service.calls.get(), 0);

    Ok(())
}
