//! Cache types for backend API responses.

use vitrine_core::{Banner, Category, Product, ProductPage, ReviewPage};

/// Cache key for catalogue responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Featured,
    Categories,
    Banners,
    /// Listing keyed by its encoded query string.
    Products(String),
    Product(String),
    Related(String),
    Reviews { product: String, page: u32, limit: u32 },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    ProductPage(ProductPage),
    Product(Box<Product>),
    Categories(Vec<Category>),
    Banners(Vec<Banner>),
    Reviews(ReviewPage),
}
