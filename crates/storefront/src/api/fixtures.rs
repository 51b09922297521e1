//! Local fixture catalogue used when no backend is available.
//!
//! Fixtures are read once at startup from a JSON file shaped like:
//!
//! ```json
//! {
//!   "products": [],
//!   "categories": [],
//!   "banners": [],
//!   "reviews": [],
//!   "orders": [],
//!   "notifications": [],
//!   "account": { "profile": { }, "password": "..." }
//! }
//! ```
//!
//! Every section is optional. Without a configured file the demo catalogue
//! in `fixtures/catalog.json` is compiled in and used instead.

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use vitrine_core::{
    Banner, Category, Notification, Order, OrderId, Product, ProductId, Review, UserProfile,
};

/// Demo catalogue served when no fixture file is configured.
const BUNDLED_CATALOG: &str = include_str!("../../../../fixtures/catalog.json");

/// Label used in errors and logs for [`BUNDLED_CATALOG`].
const BUNDLED_LABEL: &str = "bundled catalogue";

/// Number of featured products shown on the home page.
pub const FEATURED_LIMIT: usize = 8;

/// Number of related products shown on a product page.
pub const RELATED_LIMIT: usize = 4;

/// Errors loading the fixture file.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixtures from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse fixtures from {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The demo account that can sign in while in fixture mode.
#[derive(Deserialize)]
pub struct FixtureAccount {
    pub profile: UserProfile,
    #[serde(deserialize_with = "deserialize_secret")]
    password: SecretString,
}

impl FixtureAccount {
    /// Create an account with the given password.
    #[must_use]
    pub fn new(profile: UserProfile, password: impl Into<String>) -> Self {
        Self {
            profile,
            password: SecretString::from(password.into()),
        }
    }

    /// Whether `email` and `password` identify this account.
    #[must_use]
    pub fn verify(&self, email: &str, password: &SecretString) -> bool {
        self.profile.email.as_str().eq_ignore_ascii_case(email.trim())
            && self.password.expose_secret() == password.expose_secret()
    }
}

impl std::fmt::Debug for FixtureAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureAccount")
            .field("profile", &self.profile)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: serde::Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// In-memory fixture data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub banners: Vec<Banner>,
    pub reviews: Vec<Review>,
    pub orders: Vec<Order>,
    pub notifications: Vec<Notification>,
    pub account: Option<FixtureAccount>,
}

impl Fixtures {
    /// Load fixtures from `path`, or the bundled demo catalogue when `path`
    /// is `None`.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError` if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, FixtureError> {
        let Some(path) = path else {
            return Self::parse(BUNDLED_CATALOG, BUNDLED_LABEL.to_string());
        };

        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: display.clone(),
            source,
        })?;
        Self::parse(&raw, display)
    }

    fn parse(raw: &str, source_label: String) -> Result<Self, FixtureError> {
        let fixtures: Self = serde_json::from_str(raw).map_err(|source| FixtureError::Parse {
            path: source_label.clone(),
            source,
        })?;

        tracing::info!(
            source = %source_label,
            products = fixtures.products.len(),
            categories = fixtures.categories.len(),
            "Loaded fixtures"
        );
        Ok(fixtures)
    }

    /// Featured products, at most [`FEATURED_LIMIT`].
    #[must_use]
    pub fn featured(&self) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.featured)
            .take(FEATURED_LIMIT)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn product_by_slug(&self, slug: &str) -> Option<Product> {
        self.products.iter().find(|p| p.slug == slug).cloned()
    }

    /// Same-category products other than `product`, at most [`RELATED_LIMIT`].
    #[must_use]
    pub fn related(&self, product: &Product) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.category_id == product.category_id && p.id != product.id)
            .take(RELATED_LIMIT)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn reviews_for(&self, product_id: &ProductId) -> Vec<Review> {
        self.reviews
            .iter()
            .filter(|r| &r.product_id == product_id)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn order(&self, id: &OrderId) -> Option<Order> {
        self.orders.iter().find(|o| &o.id == id).cloned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    fn fixtures() -> Fixtures {
        serde_json::from_value(serde_json::json!({
            "products": (1..=6).map(|i| serde_json::json!({
                "id": format!("product-{i}"),
                "name": format!("Product {i}"),
                "slug": format!("product-{i}"),
                "price": 10 * i,
                "categoryId": if i % 2 == 0 { "even" } else { "odd" },
                "category": {
                    "id": if i % 2 == 0 { "even" } else { "odd" },
                    "name": "Category",
                    "slug": if i % 2 == 0 { "even" } else { "odd" }
                },
                "featured": i <= 3,
                "createdAt": "2026-01-01T00:00:00Z",
                "updatedAt": "2026-01-01T00:00:00Z"
            })).collect::<Vec<_>>(),
            "account": {
                "profile": {
                    "id": "user-1",
                    "firstName": "Demo",
                    "lastName": "Shopper",
                    "email": "demo@example.com",
                    "createdAt": "2026-01-01T00:00:00Z"
                },
                "password": "correct horse battery"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_featured_and_related() {
        let fixtures = fixtures();
        assert_eq!(fixtures.featured().len(), 3);

        let product = fixtures.product_by_slug("product-2").unwrap();
        let related = fixtures.related(&product);
        let ids: Vec<&str> = related.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["product-4", "product-6"]);
    }

    #[test]
    fn test_account_verification() {
        let fixtures = fixtures();
        let account = fixtures.account.as_ref().unwrap();
        let good = SecretString::from("correct horse battery");
        let bad = SecretString::from("wrong");

        assert!(account.verify("Demo@Example.com", &good));
        assert!(!account.verify("demo@example.com", &bad));
        assert!(!account.verify("other@example.com", &good));
        assert!(!format!("{account:?}").contains("correct horse"));
    }

    #[test]
    fn test_load_none_uses_bundled_catalogue() {
        let fixtures = Fixtures::load(None).unwrap();
        assert_eq!(fixtures.products.len(), 6);
        assert_eq!(fixtures.categories.len(), 4);
        assert!(!fixtures.banners.is_empty());
        assert!(!fixtures.notifications.is_empty());
        assert!(fixtures.product_by_slug("oak-lounge-chair").is_some());

        let account = fixtures.account.as_ref().unwrap();
        assert!(account.verify("demo@vitrine.test", &SecretString::from("window-shopping")));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let path =
            std::env::temp_dir().join(format!("vitrine-fixtures-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = Fixtures::load(Some(&path)).unwrap_err();
        assert!(matches!(err, FixtureError::Parse { .. }));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let err = Fixtures::load(Some(Path::new("/nonexistent/vitrine.json"))).unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }
}
