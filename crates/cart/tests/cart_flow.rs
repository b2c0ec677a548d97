//! End-to-end cart flows over in-memory and file-backed storage.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rust_decimal::Decimal;

use gomarket_cart::storage::keys;
use gomarket_cart::summary::{subtotal, unit_count};
use gomarket_cart::{CartStorage, CartStore, FileStorage, MemoryStorage, Product};
use gomarket_core::{Price, ProductId};

fn product(id: &str, cents: u64) -> Product {
    Product {
        id: ProductId::parse(id).unwrap(),
        title: format!("Product {id}"),
        image_url: format!("https://img.test/{id}.png"),
        price: Price::from_cents(cents),
    }
}

fn id(s: &str) -> ProductId {
    ProductId::parse(s).unwrap()
}

/// The full add/add/decrement/decrement scenario: quantities, totals, and
/// the removal of the line once it hits zero.
#[tokio::test]
async fn add_increment_decrement_scenario() {
    let store = CartStore::open(Arc::new(MemoryStorage::new())).await.unwrap();

    store.add_to_cart(product("p1", 400));
    let cart = store.cart();
    assert_eq!(cart.get(&id("p1")).unwrap().quantity, 1);
    assert_eq!(subtotal(cart.items()), Decimal::from(4));
    assert_eq!(unit_count(cart.items()), 1);

    store.add_to_cart(product("p1", 400));
    let cart = store.cart();
    assert_eq!(cart.get(&id("p1")).unwrap().quantity, 2);
    assert_eq!(subtotal(cart.items()), Decimal::from(8));
    assert_eq!(unit_count(cart.items()), 2);

    store.decrement(&id("p1"));
    let cart = store.cart();
    assert_eq!(cart.get(&id("p1")).unwrap().quantity, 1);
    assert_eq!(subtotal(cart.items()), Decimal::from(4));
    assert_eq!(unit_count(cart.items()), 1);

    store.decrement(&id("p1"));
    let cart = store.cart();
    assert!(cart.get(&id("p1")).is_none());
    assert_eq!(subtotal(cart.items()), Decimal::ZERO);
    assert_eq!(unit_count(cart.items()), 0);
}

/// A cart persisted by one store is hydrated intact by the next - the
/// restart path over real files.
#[tokio::test]
async fn cart_survives_restart_on_file_storage() {
    let dir = tempfile::tempdir().unwrap();

    {
        let storage = Arc::new(FileStorage::open(dir.path()).await.unwrap());
        let store = CartStore::open(storage).await.unwrap();
        store.add_to_cart(product("p1", 400));
        store.add_to_cart(product("p2", 250));
        store.increment(&id("p2"));
        store.flush().await;
    }

    let storage = Arc::new(FileStorage::open(dir.path()).await.unwrap());
    let store = CartStore::open(storage).await.unwrap();
    let cart = store.cart();

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.get(&id("p1")).unwrap().quantity, 1);
    assert_eq!(cart.get(&id("p2")).unwrap().quantity, 2);
    assert_eq!(subtotal(cart.items()), Decimal::new(900, 2));
}

/// Mutations issued back to back, from several handles, without awaiting:
/// after the queue drains, the durable blob matches the final in-memory
/// state exactly. This is the write-ordering hazard the single-writer
/// queue exists to close.
#[tokio::test]
async fn durable_state_matches_memory_after_write_burst() {
    let storage = Arc::new(MemoryStorage::new());
    let store = CartStore::open(storage.clone()).await.unwrap();
    let clone = store.clone();

    for i in 0..10 {
        store.add_to_cart(product(&format!("p{i}"), 100));
        clone.increment(&id(&format!("p{i}")));
    }
    store.decrement(&id("p0"));
    store.flush().await;

    let bytes = storage.get(keys::CART).await.unwrap().unwrap();
    let persisted: gomarket_cart::Cart = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(persisted, *store.cart());
    assert_eq!(persisted.get(&id("p0")).unwrap().quantity, 1);
    assert_eq!(persisted.get(&id("p9")).unwrap().quantity, 2);
}

/// A blob written by hand in the documented wire format hydrates as-is.
#[tokio::test]
async fn hydrates_documented_wire_format() {
    let storage = Arc::new(MemoryStorage::new());
    let blob = br#"[
        {"id":"a","title":"X","image_url":"u","price":2,"quantity":3}
    ]"#;
    storage.set(keys::CART, blob.to_vec()).await.unwrap();

    let store = CartStore::open(storage).await.unwrap();
    let cart = store.cart();

    assert_eq!(cart.len(), 1);
    let item = cart.get(&id("a")).unwrap();
    assert_eq!(item.title, "X");
    assert_eq!(item.image_url, "u");
    assert_eq!(item.price.amount(), Decimal::from(2));
    assert_eq!(item.quantity, 3);
    assert_eq!(subtotal(cart.items()), Decimal::from(6));
}
