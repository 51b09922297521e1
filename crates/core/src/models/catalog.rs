//! Catalogue entities: products, categories, variants and banners.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{BannerId, CategoryId, Price, ProductId, VariantId};

/// A product as listed in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    /// Long description (may contain HTML).
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    /// Current unit price.
    pub price: Price,
    /// Discount percentage, 0-100.
    #[serde(default)]
    pub discount: Decimal,
    /// Units available.
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// Average review rating (0-5).
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    pub category_id: CategoryId,
    pub category: Category,
    #[serde(default)]
    pub brand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<Variant>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<Vec<Specification>>,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product carries a discount.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.discount > Decimal::ZERO
    }

    /// Whether any units are available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Unit price after the product discount.
    #[must_use]
    pub fn sale_price(&self) -> Price {
        self.price.discounted(self.discount)
    }

    /// Look up one of this product's variants.
    #[must_use]
    pub fn variant(&self, id: &VariantId) -> Option<&Variant> {
        self.variants.as_deref()?.iter().find(|v| &v.id == id)
    }

    /// First image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// A selectable product attribute value (e.g. Color: Red).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    /// Attribute name, e.g. "Color" or "Size".
    pub name: String,
    /// Attribute value, e.g. "Red".
    pub value: String,
}

/// A name/value product specification row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    pub name: String,
    pub value: String,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Category>,
}

/// A home page promotional banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: BannerId,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub image_url: String,
    pub link: String,
}
