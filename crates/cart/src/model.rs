//! Cart data model.
//!
//! The persisted encoding is the full ordered line-item list as a JSON
//! array; field names (`id`, `title`, `image_url`, `price`, `quantity`)
//! are part of the stored format and must stay stable across releases.

use serde::{Deserialize, Serialize};

use gomarket_core::{Price, ProductId};
use rust_decimal::Decimal;

/// A product descriptor, as handed to [`add`](Cart::add).
///
/// Carries no quantity - the cart assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog id, stable across sessions.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Display image reference.
    pub image_url: String,
    /// Unit price.
    pub price: Price,
}

/// One product selected for purchase, with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog id, stable across sessions.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Display image reference.
    pub image_url: String,
    /// Unit price.
    pub price: Price,
    /// Unit count; always >= 1 while the item is in the cart.
    pub quantity: u32,
}

impl LineItem {
    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.amount() * Decimal::from(self.quantity)
    }
}

impl From<Product> for LineItem {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity: 1,
        }
    }
}

/// The ordered collection of line items for the current session.
///
/// Items are unique by id. Updating a quantity preserves the item's
/// position; new items append at the end.
///
/// `Cart` itself is a plain value. [`CartStore`](crate::store::CartStore)
/// applies these mutators copy-on-write, so snapshots handed to consumers
/// are never mutated after the fact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line item by product id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// Add a product: bump the quantity if the id is already present,
    /// otherwise append a new line with quantity 1.
    pub fn add(&mut self, product: Product) {
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(item) => item.quantity += 1,
            None => self.items.push(LineItem::from(product)),
        }
    }

    /// Increase the quantity of an existing line by 1.
    ///
    /// Returns `false` (and changes nothing) if the id is not in the cart.
    pub fn increment(&mut self, id: &ProductId) -> bool {
        match self.items.iter_mut().find(|item| item.id == *id) {
            Some(item) => {
                item.quantity += 1;
                true
            }
            None => false,
        }
    }

    /// Decrease the quantity of an existing line by 1, removing the line
    /// when it reaches zero.
    ///
    /// Returns `false` (and changes nothing) if the id is not in the cart.
    pub fn decrement(&mut self, id: &ProductId) -> bool {
        let Some(index) = self.items.iter().position(|item| item.id == *id) else {
            return false;
        };

        let remove = match self.items.get_mut(index) {
            Some(item) if item.quantity > 1 => {
                item.quantity -= 1;
                false
            }
            Some(_) => true,
            None => return false,
        };

        if remove {
            self.items.remove(index);
        }
        true
    }
}
