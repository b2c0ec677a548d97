//! Cart commands: show, add, increment, decrement.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart with its summary line
//! gm-cli show
//!
//! # Add one unit of a product (or bump its quantity)
//! gm-cli add --id p1 --title "Mechanical Keyboard" --image-url https://img.test/p1.png --price 129.90
//!
//! # Change quantities
//! gm-cli increment p1
//! gm-cli decrement p1
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use gomarket_cart::{CartStore, FloatingCart, Product};
use gomarket_core::{Price, PriceError, ProductId, ProductIdError};

/// Errors that can occur while running cart commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The product id argument is not a valid id.
    #[error("Invalid product id: {0}")]
    InvalidProductId(#[from] ProductIdError),

    /// The price argument is not a valid decimal amount.
    #[error("Invalid price '{input}': {reason}")]
    InvalidPrice {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Parse a price argument like `129.90`.
fn parse_price(input: &str) -> Result<Price, CommandError> {
    let amount = Decimal::from_str(input).map_err(|e| CommandError::InvalidPrice {
        input: input.to_string(),
        reason: e.to_string(),
    })?;

    Price::new(amount).map_err(|e: PriceError| CommandError::InvalidPrice {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Print the cart contents and the floating summary line.
#[allow(clippy::print_stdout)]
pub fn show(store: &CartStore, summary: &FloatingCart) {
    let cart = store.cart();

    if cart.is_empty() {
        println!("cart is empty");
    } else {
        for item in cart.items() {
            println!(
                "{:<20} x{:<4} @ {}  ({})",
                item.title,
                item.quantity,
                item.price,
                item.id
            );
        }
    }

    let view = summary.view();
    println!("{} items | {}", view.item_count, view.subtotal);
}

/// Add one unit of a product to the cart.
pub fn add(
    store: &CartStore,
    id: &str,
    title: &str,
    image_url: &str,
    price: &str,
) -> Result<(), CommandError> {
    let product = Product {
        id: ProductId::parse(id)?,
        title: title.to_string(),
        image_url: image_url.to_string(),
        price: parse_price(price)?,
    };

    store.add_to_cart(product);
    tracing::info!(id, "added to cart");
    Ok(())
}

/// Increase the quantity of a cart line by 1.
pub fn increment(store: &CartStore, id: &str) -> Result<(), CommandError> {
    let id = ProductId::parse(id)?;
    store.increment(&id);
    tracing::info!(%id, "incremented");
    Ok(())
}

/// Decrease the quantity of a cart line by 1.
pub fn decrement(store: &CartStore, id: &str) -> Result<(), CommandError> {
    let id = ProductId::parse(id)?;
    store.decrement(&id);
    tracing::info!(%id, "decremented");
    Ok(())
}
