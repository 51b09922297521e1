//! Wishlist state container.
//!
//! Saved products keyed by product ID; each product appears at most once
//! and insertion order is kept.

use serde::{Deserialize, Serialize};

use crate::models::Product;
use crate::types::ProductId;

/// A customer's saved products.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wishlist {
    #[serde(default)]
    items: Vec<Product>,
}

impl Wishlist {
    /// Create an empty wishlist.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Saved products in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|p| &p.id == product_id)
    }

    /// Save a product. Returns `false` if it was already saved.
    pub fn add(&mut self, product: Product) -> bool {
        if self.contains(&product.id) {
            return false;
        }
        self.items.push(product);
        true
    }

    /// Remove a product. Returns `true` if it was present.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|p| &p.id != product_id);
        self.items.len() != before
    }

    /// Add the product if absent, remove it if present.
    ///
    /// Returns whether the product is saved afterwards.
    pub fn toggle(&mut self, product: Product) -> bool {
        if self.remove(&product.id) {
            false
        } else {
            self.items.push(product);
            true
        }
    }

    /// Replace the contents, keeping the first occurrence of each product.
    pub fn replace(&mut self, products: impl IntoIterator<Item = Product>) {
        self.items.clear();
        for product in products {
            self.add(product);
        }
    }
}
