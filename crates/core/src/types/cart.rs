//! Shopping cart aggregation.
//!
//! A [`Cart`] is an ordered list of line items, at most one per product.
//! It lives in the visitor's session and is serialized as JSON there, so it
//! holds a snapshot of the product name, price and image taken when the item
//! was added.
//!
//! ```
//! use jozoor_core::{Cart, CartItem, ProductId};
//! use rust_decimal::Decimal;
//!
//! let mut cart = Cart::default();
//! cart.add(CartItem::new(ProductId::new(1), "عسل", Decimal::from(100), 2, "/a.jpg"));
//! cart.add(CartItem::new(ProductId::new(2), "زيت", Decimal::from(50), 1, "/b.jpg"));
//! assert_eq!(cart.total(), Decimal::from(250));
//! assert_eq!(cart.item_count(), 3);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// One product-and-quantity entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    /// Always at least 1.
    pub quantity: u32,
    /// Primary image URL.
    pub image: String,
}

impl CartItem {
    /// Create a line item. A quantity of 0 is raised to 1.
    #[must_use]
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
        image: impl Into<String>,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            unit_price,
            quantity: quantity.max(1),
            image: image.into(),
        }
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Line total in the store currency.
    #[must_use]
    pub fn line_price(&self) -> Price {
        Price::store(self.line_total())
    }
}

/// A visitor's shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Add an item, merging with an existing line for the same product.
    pub fn add(&mut self, item: CartItem) {
        let added = item.quantity.max(1);
        if let Some(line) = self.line_mut(item.product_id) {
            line.quantity = line.quantity.saturating_add(added);
        } else {
            self.items.push(CartItem {
                quantity: added,
                ..item
            });
        }
    }

    /// Set the quantity of a line.
    ///
    /// Quantities below 1 and unknown products leave the cart unchanged.
    /// Returns whether the cart changed.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        if quantity < 1 {
            return false;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        match self.line_mut(product_id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Increase a line's quantity by one.
    pub fn increment(&mut self, product_id: ProductId) -> bool {
        match self.quantity_of(product_id) {
            Some(current) => self.set_quantity(product_id, i64::from(current) + 1),
            None => false,
        }
    }

    /// Decrease a line's quantity by one. A line at 1 stays at 1.
    pub fn decrement(&mut self, product_id: ProductId) -> bool {
        match self.quantity_of(product_id) {
            Some(current) => self.set_quantity(product_id, i64::from(current) - 1),
            None => false,
        }
    }

    /// Remove a line. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|line| line.product_id != product_id);
        self.items.len() != before
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Cart total in the store currency.
    #[must_use]
    pub fn total_price(&self) -> Price {
        Price::store(self.total())
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |sum, line| sum.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Quantity of a product, if it is in the cart.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> Option<u32> {
        self.items
            .iter()
            .find(|line| line.product_id == product_id)
            .map(|line| line.quantity)
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }
}
