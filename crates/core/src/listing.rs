//! Product filtering, sorting and pagination.
//!
//! These are linear passes over small in-memory collections: they back the
//! fixture catalogue and double as the reference semantics for the remote
//! `/products` query parameters.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::models::{Notification, Order, Product, Review};
use crate::types::Price;

/// Default page size for product listings.
pub const DEFAULT_PRODUCT_LIMIT: u32 = 12;

/// Largest page size a caller may request.
pub const MAX_LIMIT: u32 = 100;

/// Product sort orders accepted by the listing.
///
/// Unknown values fall back to [`SortOrder::Popular`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortOrder {
    /// Most reviewed first.
    #[default]
    Popular,
    /// Most recently created first.
    Newest,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Highest rated first.
    Rating,
}

impl SortOrder {
    /// Wire name (`price-low`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::Newest => "newest",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
        }
    }

    /// Stable in-place sort. Ties keep their incoming order.
    pub fn sort(self, products: &mut [Product]) {
        match self {
            Self::Popular => products.sort_by_key(|p| Reverse(p.review_count)),
            Self::Newest => products.sort_by_key(|p| Reverse(p.created_at)),
            Self::PriceLow => products.sort_by_key(|p| p.price),
            Self::PriceHigh => products.sort_by_key(|p| Reverse(p.price)),
            Self::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }
    }
}

impl From<&str> for SortOrder {
    fn from(value: &str) -> Self {
        match value {
            "newest" => Self::Newest,
            "price-low" => Self::PriceLow,
            "price-high" => Self::PriceHigh,
            "rating" => Self::Rating,
            _ => Self::Popular,
        }
    }
}

impl From<String> for SortOrder {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<SortOrder> for String {
    fn from(value: SortOrder) -> Self {
        value.as_str().to_string()
    }
}

/// Product listing query.
///
/// Deserializes from a query string such as
/// `?page=2&sort=price-low&category=shoes&minPrice=10&onSale=true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductQuery {
    pub page: u32,
    pub limit: u32,
    pub sort: SortOrder,
    /// Category slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Price>,
    pub on_sale: bool,
    pub in_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PRODUCT_LIMIT,
            sort: SortOrder::Popular,
            category: None,
            min_price: None,
            max_price: None,
            on_sale: false,
            in_stock: false,
            search: None,
        }
    }
}

impl ProductQuery {
    /// Whether `product` passes every active filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category.as_deref()
            && product.category.slug != category
        {
            return false;
        }
        if let Some(min) = self.min_price
            && product.price < min
        {
            return false;
        }
        if let Some(max) = self.max_price
            && product.price > max
        {
            return false;
        }
        if self.on_sale && !product.is_on_sale() {
            return false;
        }
        if self.in_stock && !product.in_stock() {
            return false;
        }
        if let Some(search) = self.search.as_deref()
            && !search.is_empty()
        {
            let needle = search.to_lowercase();
            return product.name.to_lowercase().contains(&needle)
                || product.description.to_lowercase().contains(&needle);
        }
        true
    }

    /// Filter, sort and paginate `products`.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> ProductPage {
        let mut matching: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();
        self.sort.sort(&mut matching);
        paginate(matching, self.page, self.limit).into()
    }

    /// Query-string pairs for the remote `/products` endpoint.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.max(1).to_string()),
            ("limit", clamp_limit(self.limit).to_string()),
            ("sort", self.sort.as_str().to_string()),
        ];
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("minPrice", min.amount().to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("maxPrice", max.amount().to_string()));
        }
        if self.on_sale {
            pairs.push(("onSale", "true".to_string()));
        }
        if self.in_stock {
            pairs.push(("inStock", "true".to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }
}

/// One page of a larger result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// An empty result.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            total_pages: 0,
        }
    }
}

/// Clamp a page size to `1..=MAX_LIMIT`.
#[must_use]
pub const fn clamp_limit(limit: u32) -> u32 {
    if limit < 1 {
        1
    } else if limit > MAX_LIMIT {
        MAX_LIMIT
    } else {
        limit
    }
}

/// Slice `items` into a 1-based page.
///
/// `page` below 1 is treated as 1 and `limit` is clamped to `1..=MAX_LIMIT`.
/// Pages past the end are empty but still report the totals.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> Page<T> {
    let limit = clamp_limit(limit) as usize;
    let page = page.max(1) as usize;
    let total = items.len();
    let offset = (page - 1).saturating_mul(limit);

    Page {
        items: items.into_iter().skip(offset).take(limit).collect(),
        total,
        total_pages: total.div_ceil(limit),
    }
}

macro_rules! page_wire_type {
    ($(#[$meta:meta])* $name:ident, $item:ty, $items:ident, $total:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            pub $items: Vec<$item>,
            pub $total: usize,
            pub total_pages: usize,
        }

        impl $name {
            /// An empty page.
            #[must_use]
            pub const fn empty() -> Self {
                Self {
                    $items: Vec::new(),
                    $total: 0,
                    total_pages: 0,
                }
            }
        }

        impl From<Page<$item>> for $name {
            fn from(page: Page<$item>) -> Self {
                Self {
                    $items: page.items,
                    $total: page.total,
                    total_pages: page.total_pages,
                }
            }
        }
    };
}

page_wire_type!(
    /// `{ products, totalProducts, totalPages }`
    ProductPage, Product, products, total_products
);
page_wire_type!(
    /// `{ reviews, totalReviews, totalPages }`
    ReviewPage, Review, reviews, total_reviews
);
page_wire_type!(
    /// `{ orders, totalOrders, totalPages }`
    OrderPage, Order, orders, total_orders
);
page_wire_type!(
    /// `{ notifications, totalNotifications, totalPages }`
    NotificationPage, Notification, notifications, total_notifications
);

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::Category;
    use crate::types::{CategoryId, ProductId};

    /// Twelve products shaped like the development catalogue.
    fn catalogue() -> Vec<Product> {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        (0..12_i64)
            .map(|i| {
                let category = format!("category-{}", (i % 6) + 1);
                Product {
                    id: ProductId::new(format!("product-{}", i + 1)),
                    name: format!("Product {}", i + 1),
                    slug: format!("product-{}", i + 1),
                    description: format!("Detailed description for Product {}", i + 1),
                    short_description: String::new(),
                    price: Price::from_cents(4999 + i * 1000),
                    discount: if i % 3 == 0 { Decimal::TEN } else { Decimal::ZERO },
                    stock: if i % 5 == 0 { 0 } else { 20 },
                    sku: format!("SKU-{}", 1000 + i),
                    images: Vec::new(),
                    rating: f64::from(u8::try_from(3 + (i % 3)).unwrap()),
                    review_count: u32::try_from(10 + i).unwrap(),
                    category_id: CategoryId::new(category.clone()),
                    category: Category {
                        id: CategoryId::new(category.clone()),
                        name: category.clone(),
                        slug: category,
                        description: None,
                        image_url: None,
                        parent_id: None,
                        children: Vec::new(),
                    },
                    brand: format!("Brand {}", (i % 4) + 1),
                    variants: None,
                    specifications: None,
                    featured: i < 8,
                    created_at: now - Duration::days(i),
                    updated_at: now,
                }
            })
            .collect()
    }

    fn ids(page: &ProductPage) -> Vec<&str> {
        page.products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_default_query_is_popular_first_page() {
        let page = ProductQuery::default().apply(&catalogue());
        assert_eq!(page.total_products, 12);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.products[0].id.as_str(), "product-12");
    }

    #[test]
    fn test_category_filter() {
        let query = ProductQuery {
            category: Some("category-2".to_string()),
            ..ProductQuery::default()
        };
        let page = query.apply(&catalogue());
        assert_eq!(page.total_products, 2);
        assert!(page.products.iter().all(|p| p.category.slug == "category-2"));
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let query = ProductQuery {
            min_price: Some(Price::from_cents(5999)),
            max_price: Some(Price::from_cents(7999)),
            sort: SortOrder::PriceLow,
            ..ProductQuery::default()
        };
        let page = query.apply(&catalogue());
        assert_eq!(ids(&page), vec!["product-2", "product-3", "product-4"]);
    }

    #[test]
    fn test_on_sale_and_in_stock() {
        let query = ProductQuery {
            on_sale: true,
            in_stock: true,
            ..ProductQuery::default()
        };
        let page = query.apply(&catalogue());
        // On sale: 1, 4, 7, 10. Out of stock: 1, 6, 11.
        let mut found = ids(&page);
        found.sort_unstable();
        assert_eq!(found, vec!["product-10", "product-4", "product-7"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_description() {
        let query = ProductQuery {
            search: Some("PRODUCT 1".to_string()),
            ..ProductQuery::default()
        };
        // "Product 1", "Product 10", "Product 11", "Product 12"
        assert_eq!(query.apply(&catalogue()).total_products, 4);

        let query = ProductQuery {
            search: Some("detailed".to_string()),
            ..ProductQuery::default()
        };
        assert_eq!(query.apply(&catalogue()).total_products, 12);
    }

    #[test]
    fn test_search_matches_untrimmed_text() {
        let count = |search: &str| {
            ProductQuery {
                search: Some(search.to_string()),
                ..ProductQuery::default()
            }
            .apply(&catalogue())
            .total_products
        };

        // No product text ends in "2 ".
        assert_eq!(count("2 "), 0);
        assert_eq!(count("2"), 2);
        assert_eq!(count("   "), 0);
        assert_eq!(count(""), 12);
    }

    #[test]
    fn test_sorts() {
        let products = catalogue();
        let first = |sort| {
            ProductQuery {
                sort,
                ..ProductQuery::default()
            }
            .apply(&products)
            .products[0]
                .id
                .to_string()
        };
        assert_eq!(first(SortOrder::Newest), "product-1");
        assert_eq!(first(SortOrder::PriceLow), "product-1");
        assert_eq!(first(SortOrder::PriceHigh), "product-12");
        // Ratings 5 first; stable sort keeps the earliest rating-5 product first.
        assert_eq!(first(SortOrder::Rating), "product-3");
    }

    #[test]
    fn test_unknown_sort_falls_back_to_popular() {
        assert_eq!(SortOrder::from("bogus"), SortOrder::Popular);
        let parsed: SortOrder = serde_json::from_str("\"price-high\"").unwrap();
        assert_eq!(parsed, SortOrder::PriceHigh);
        assert_eq!(serde_json::to_string(&SortOrder::PriceLow).unwrap(), "\"price-low\"");
    }

    #[test]
    fn test_pagination() {
        let query = ProductQuery {
            page: 2,
            limit: 5,
            sort: SortOrder::Newest,
            ..ProductQuery::default()
        };
        let page = query.apply(&catalogue());
        assert_eq!(page.total_pages, 3);
        assert_eq!(
            ids(&page),
            vec!["product-6", "product-7", "product-8", "product-9", "product-10"]
        );

        let past_end = ProductQuery {
            page: 9,
            ..query
        }
        .apply(&catalogue());
        assert!(past_end.products.is_empty());
        assert_eq!(past_end.total_products, 12);
    }

    #[test]
    fn test_paginate_clamps_inputs() {
        let page = paginate((1..=8).collect::<Vec<_>>(), 0, 0);
        assert_eq!(page.items, vec![1]);
        assert_eq!(page.total_pages, 8);

        let page = paginate((1..=8).collect::<Vec<_>>(), 1, 1000);
        assert_eq!(page.items.len(), 8);
        assert_eq!(page.total_pages, 1);

        let empty: Page<u8> = paginate(Vec::new(), 1, 5);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_clamp_limit_bounds() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(1), 1);
        assert_eq!(clamp_limit(24), 24);
        assert_eq!(clamp_limit(MAX_LIMIT), MAX_LIMIT);
        assert_eq!(clamp_limit(u32::MAX), MAX_LIMIT);
    }

    const CLAMPED_AT_COMPILE_TIME: u32 = clamp_limit(500);

    #[test]
    fn test_clamp_limit_is_const() {
        assert_eq!(CLAMPED_AT_COMPILE_TIME, MAX_LIMIT);
    }

    #[test]
    fn test_query_pairs() {
        let query = ProductQuery {
            category: Some("shoes".to_string()),
            min_price: Some(Price::from_cents(1000)),
            on_sale: true,
            ..ProductQuery::default()
        };
        let pairs = query.to_query_pairs();
        assert!(pairs.contains(&("sort", "popular".to_string())));
        assert!(pairs.contains(&("category", "shoes".to_string())));
        assert!(pairs.contains(&("minPrice", "10.00".to_string())));
        assert!(pairs.contains(&("onSale", "true".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "inStock"));
    }

    #[test]
    fn test_product_page_wire_names() {
        let page = ProductPage::empty();
        let json = serde_json::to_value(&page).unwrap();
        assert!(json.get("totalProducts").is_some());
        assert!(json.get("totalPages").is_some());
    }
}
