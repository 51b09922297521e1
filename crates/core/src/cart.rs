//! Cart state container.
//!
//! A cart is an ordered list of lines. A line is identified by the product
//! together with the selected variant: the same product in two colours is
//! two lines, and a line without a variant only ever matches another
//! variant-less add of the same product.
//!
//! Quantities are always kept within `1..=stock`. Totals are derived on
//! demand from the lines and a [`CartPolicy`]:
//!
//! ```text
//! subtotal = Σ price × qty
//! discount = Σ discount% × price × qty          (rounded to cents)
//! shipping = 0 if empty or subtotal > threshold, else flat rate
//! tax      = (subtotal − discount) × tax rate   (rounded to cents)
//! total    = subtotal − discount + shipping + tax
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Product, Variant};
use crate::types::{Price, ProductId, VariantId};

/// Errors returned by cart mutations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    /// Quantities must be at least one.
    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(u32),

    /// The product has no units available.
    #[error("{0} is out of stock")]
    OutOfStock(ProductId),

    /// The requested variant does not belong to the product.
    #[error("variant {variant} does not belong to product {product}")]
    UnknownVariant {
        product: ProductId,
        variant: VariantId,
    },

    /// No line matches the product and variant.
    #[error("no cart line for product {0}")]
    LineNotFound(ProductId),
}

/// Pricing rules applied when deriving cart totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartPolicy {
    /// Orders with a subtotal strictly above this ship free.
    pub free_shipping_threshold: Price,
    /// Shipping charged below the threshold.
    pub flat_shipping: Price,
    /// Tax rate applied to the discounted subtotal (0.08 = 8%).
    pub tax_rate: Decimal,
}

impl Default for CartPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Price::from_cents(5000),
            flat_shipping: Price::from_cents(599),
            tax_rate: Decimal::new(8, 2),
        }
    }
}

/// One cart line: a product snapshot, a quantity, and an optional variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_variant: Option<Variant>,
}

impl CartItem {
    /// Whether this line is the one identified by `product_id` + `variant_id`.
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, variant_id: Option<&VariantId>) -> bool {
        self.product.id == *product_id
            && self.selected_variant.as_ref().map(|v| &v.id) == variant_id
    }

    /// Stable key for the line, `product-1` or `product-1:variant-0-2`.
    #[must_use]
    pub fn key(&self) -> String {
        match &self.selected_variant {
            Some(variant) => format!("{}:{}", self.product.id, variant.id),
            None => self.product.id.to_string(),
        }
    }

    /// Unit price × quantity, before discount.
    #[must_use]
    pub fn line_subtotal(&self) -> Price {
        self.product.price * self.quantity
    }

    /// Discount amount for the whole line (unrounded).
    #[must_use]
    pub fn line_discount(&self) -> Price {
        self.product.price.percent(self.product.discount) * self.quantity
    }
}

/// Derived cart totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: u32,
    pub subtotal: Price,
    pub discount: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

/// The cart itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find a line by identity.
    #[must_use]
    pub fn line(
        &self,
        product_id: &ProductId,
        variant_id: Option<&VariantId>,
    ) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|item| item.matches(product_id, variant_id))
    }

    /// Add `quantity` units of a product, optionally in a given variant.
    ///
    /// Merges into an existing line with the same identity, otherwise
    /// appends a new line. The resulting line quantity is clamped to the
    /// product's stock, and the line's product snapshot is refreshed.
    /// Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity` for zero, `OutOfStock` if the product has no
    /// stock, and `UnknownVariant` if `variant_id` is not one of the
    /// product's variants.
    pub fn add(
        &mut self,
        product: Product,
        quantity: u32,
        variant_id: Option<&VariantId>,
    ) -> Result<u32, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        if !product.in_stock() {
            return Err(CartError::OutOfStock(product.id));
        }

        let variant = match variant_id {
            Some(id) => Some(product.variant(id).cloned().ok_or_else(|| {
                CartError::UnknownVariant {
                    product: product.id.clone(),
                    variant: id.clone(),
                }
            })?),
            None => None,
        };

        let stock = product.stock;
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.matches(&product.id, variant_id))
        {
            item.quantity = item.quantity.saturating_add(quantity).min(stock);
            item.product = product;
            return Ok(item.quantity);
        }

        let quantity = quantity.min(stock);
        self.items.push(CartItem {
            product,
            quantity,
            selected_variant: variant,
        });
        Ok(quantity)
    }

    /// Remove exactly the line identified by product + variant.
    ///
    /// Returns `true` if a line was removed.
    pub fn remove(&mut self, product_id: &ProductId, variant_id: Option<&VariantId>) -> bool {
        let before = self.items.len();
        self.items
            .retain(|item| !item.matches(product_id, variant_id));
        self.items.len() != before
    }

    /// Set the quantity of a line, clamped to stock.
    ///
    /// Returns the quantity actually applied.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity` if `quantity` is zero (the line is left
    /// unchanged) and `LineNotFound` if there is no matching line.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
        variant_id: Option<&VariantId>,
    ) -> Result<u32, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let item = self
            .items
            .iter_mut()
            .find(|item| item.matches(product_id, variant_id))
            .ok_or_else(|| CartError::LineNotFound(product_id.clone()))?;

        item.quantity = quantity.min(item.product.stock.max(1));
        Ok(item.quantity)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Σ price × quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_subtotal).sum()
    }

    /// Σ per-line discounts, rounded to cents.
    #[must_use]
    pub fn discount(&self) -> Price {
        self.items
            .iter()
            .map(CartItem::line_discount)
            .sum::<Price>()
            .round_cents()
    }

    /// Derive every total under `policy`.
    #[must_use]
    pub fn totals(&self, policy: &CartPolicy) -> CartTotals {
        let subtotal = self.subtotal();
        let discount = self.discount();

        let shipping = if self.is_empty() || subtotal > policy.free_shipping_threshold {
            Price::ZERO
        } else {
            policy.flat_shipping
        };

        let tax = (subtotal - discount).scale(policy.tax_rate).round_cents();
        let total = subtotal - discount + shipping + tax;

        CartTotals {
            item_count: self.item_count(),
            subtotal,
            discount,
            shipping,
            tax,
            total,
        }
    }
}
