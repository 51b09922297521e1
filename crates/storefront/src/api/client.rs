//! Backend API client implementation.
//!
//! Uses `reqwest` 0.13 for HTTP with a fixed per-request timeout. Catalogue
//! reads are cached using `moka`; user-scoped calls are never cached.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use moka::future::Cache;
use rand::Rng;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;
use uuid::Uuid;
use vitrine_core::{
    Banner, Category, Notification, NotificationId, NotificationPage, Order, OrderConfirmation,
    OrderId, OrderPage, Product, ProductId, ProductPage, ProductQuery, ProfileUpdate, Review,
    ReviewId, ReviewPage, ReviewSubmission, UserId, UserProfile, paginate,
};

use super::cache::{CacheKey, CacheValue};
use super::fixtures::{FEATURED_LIMIT, Fixtures, RELATED_LIMIT};
use super::types::{
    AuthSession, CredentialsBody, OrderRequest, ReadBody, RegisterBody, Registration,
    WishlistBody,
};
use super::{ApiError, error_message};
use crate::config::BackendConfig;

/// Reviews per page when the caller does not say.
pub const DEFAULT_REVIEW_LIMIT: u32 = 5;

/// Orders per page when the caller does not say.
pub const DEFAULT_ORDER_LIMIT: u32 = 10;

/// Notifications per page when the caller does not say.
pub const DEFAULT_NOTIFICATION_LIMIT: u32 = 10;

/// TTL for rarely changing data: featured products, categories, banners.
const LONG_TTL: Duration = Duration::from_secs(60 * 60);

/// TTL for listings, product detail, related products and reviews.
const SHORT_TTL: Duration = Duration::from_secs(5 * 60);

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront backend.
///
/// Cheap to clone; all clones share the HTTP connection pool, caches and
/// fixtures.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    /// `None` in fixture mode.
    base_url: Option<Url>,
    service_token: Option<SecretString>,
    fixtures: Fixtures,
    long_cache: Cache<CacheKey, CacheValue>,
    short_cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig, fixtures: Fixtures) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let long_cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(LONG_TTL)
            .build();
        let short_cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(SHORT_TTL)
            .support_invalidation_closures()
            .build();

        let base_url = config.remote_url().cloned();
        match &base_url {
            Some(url) => tracing::info!(backend = %url, "Using backend API"),
            None => tracing::info!("No backend configured, serving fixtures"),
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                service_token: config.access_token.clone(),
                fixtures,
                long_cache,
                short_cache,
            }),
        })
    }

    /// Whether calls are answered from fixtures only.
    #[must_use]
    pub fn is_fixture_mode(&self) -> bool {
        self.inner.base_url.is_none()
    }

    /// The loaded fixture data.
    #[must_use]
    pub fn fixtures(&self) -> &Fixtures {
        &self.inner.fixtures
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Build a request to `segments` below the backend base URL.
    ///
    /// Segments are percent-encoded individually, so slugs and IDs cannot
    /// escape their path position.
    fn request(
        &self,
        base: &Url,
        method: Method,
        segments: &[&str],
        token: Option<&SecretString>,
    ) -> Result<RequestBuilder, ApiError> {
        let mut endpoint = base.clone();
        endpoint
            .path_segments_mut()
            .map_err(|()| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);

        let mut builder = self.inner.client.request(method, endpoint);
        if let Some(token) = token.or(self.inner.service_token.as_ref()) {
            builder = builder.bearer_auth(token.expose_secret());
        }
        Ok(builder)
    }

    /// Send a request and return the body of a successful response.
    async fn send(request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(body)
    }

    /// Send a request and decode its JSON body.
    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let body = Self::send(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    /// Confirm the backend answers. Always succeeds in fixture mode.
    ///
    /// # Errors
    ///
    /// Returns the transport or status error from the backend.
    pub async fn check_backend(&self) -> Result<(), ApiError> {
        let Some(base) = &self.inner.base_url else {
            return Ok(());
        };
        let request = self.request(base, Method::GET, &["categories"], None)?;
        Self::send(request).await.map(|_| ())
    }

    // =========================================================================
    // Catalogue
    // =========================================================================

    /// Featured products for the home page.
    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Vec<Product> {
        let Some(base) = &self.inner.base_url else {
            return self.inner.fixtures.featured();
        };

        if let Some(CacheValue::Products(products)) =
            self.inner.long_cache.get(&CacheKey::Featured).await
        {
            debug!("Cache hit for featured products");
            return products;
        }

        let result = async {
            let request = self
                .request(base, Method::GET, &["products"], None)?
                .query(&[("featured", "true".to_string()), ("limit", FEATURED_LIMIT.to_string())]);
            Self::send_json::<Vec<Product>>(request).await
        }
        .await;

        match result {
            Ok(products) => {
                self.inner
                    .long_cache
                    .insert(CacheKey::Featured, CacheValue::Products(products.clone()))
                    .await;
                products
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch featured products, using fixtures");
                self.inner.fixtures.featured()
            }
        }
    }

    /// All categories.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Vec<Category> {
        let Some(base) = &self.inner.base_url else {
            return self.inner.fixtures.categories.clone();
        };

        if let Some(CacheValue::Categories(categories)) =
            self.inner.long_cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return categories;
        }

        let result = async {
            let request = self.request(base, Method::GET, &["categories"], None)?;
            Self::send_json::<Vec<Category>>(request).await
        }
        .await;

        match result {
            Ok(categories) => {
                self.inner
                    .long_cache
                    .insert(CacheKey::Categories, CacheValue::Categories(categories.clone()))
                    .await;
                categories
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch categories, using fixtures");
                self.inner.fixtures.categories.clone()
            }
        }
    }

    /// Home page banners.
    #[instrument(skip(self))]
    pub async fn banners(&self) -> Vec<Banner> {
        let Some(base) = &self.inner.base_url else {
            return self.inner.fixtures.banners.clone();
        };

        if let Some(CacheValue::Banners(banners)) =
            self.inner.long_cache.get(&CacheKey::Banners).await
        {
            debug!("Cache hit for banners");
            return banners;
        }

        let result = async {
            let request = self.request(base, Method::GET, &["banners"], None)?;
            Self::send_json::<Vec<Banner>>(request).await
        }
        .await;

        match result {
            Ok(banners) => {
                self.inner
                    .long_cache
                    .insert(CacheKey::Banners, CacheValue::Banners(banners.clone()))
                    .await;
                banners
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch banners, using fixtures");
                self.inner.fixtures.banners.clone()
            }
        }
    }

    /// One page of the product listing.
    #[instrument(skip(self), fields(page = query.page, sort = query.sort.as_str()))]
    pub async fn products(&self, query: &ProductQuery) -> ProductPage {
        let Some(base) = &self.inner.base_url else {
            return query.apply(&self.inner.fixtures.products);
        };

        let pairs = query.to_query_pairs();
        let cache_key = CacheKey::Products(
            pairs
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join("&"),
        );

        if let Some(CacheValue::ProductPage(page)) = self.inner.short_cache.get(&cache_key).await {
            debug!("Cache hit for product listing");
            return page;
        }

        let result = async {
            let request = self
                .request(base, Method::GET, &["products"], None)?
                .query(&pairs);
            Self::send_json::<ProductPage>(request).await
        }
        .await;

        match result {
            Ok(page) => {
                self.inner
                    .short_cache
                    .insert(cache_key, CacheValue::ProductPage(page.clone()))
                    .await;
                page
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch products, using fixtures");
                query.apply(&self.inner.fixtures.products)
            }
        }
    }

    /// Look up a product by slug.
    ///
    /// Fixture mode reads the fixture catalogue. With a backend configured,
    /// any failure (404 or otherwise) means no product.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Option<Product> {
        let Some(base) = &self.inner.base_url else {
            return self.inner.fixtures.product_by_slug(slug);
        };

        let cache_key = CacheKey::Product(slug.to_string());
        if let Some(CacheValue::Product(product)) = self.inner.short_cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Some(*product);
        }

        let result = async {
            let request = self.request(base, Method::GET, &["products", slug], None)?;
            Self::send_json::<Product>(request).await
        }
        .await;

        match result {
            Ok(product) => {
                self.inner
                    .short_cache
                    .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
                    .await;
                Some(product)
            }
            Err(e) if e.is_not_found() => {
                debug!("Product not found");
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch product");
                None
            }
        }
    }

    /// Products related to `product`. Empty when the backend fails.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn related_products(&self, product: &Product) -> Vec<Product> {
        let Some(base) = &self.inner.base_url else {
            return self.inner.fixtures.related(product);
        };

        let cache_key = CacheKey::Related(product.id.to_string());
        if let Some(CacheValue::Products(products)) = self.inner.short_cache.get(&cache_key).await
        {
            debug!("Cache hit for related products");
            return products;
        }

        let result = async {
            let request = self
                .request(base, Method::GET, &["products", "related"], None)?
                .query(&[
                    ("productId", product.id.to_string()),
                    ("categoryId", product.category_id.to_string()),
                    ("limit", RELATED_LIMIT.to_string()),
                ]);
            Self::send_json::<Vec<Product>>(request).await
        }
        .await;

        match result {
            Ok(products) => {
                self.inner
                    .short_cache
                    .insert(cache_key, CacheValue::Products(products.clone()))
                    .await;
                products
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch related products");
                Vec::new()
            }
        }
    }

    /// One page of a product's reviews. Empty when the backend fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn reviews(&self, product_id: &ProductId, page: u32, limit: u32) -> ReviewPage {
        let Some(base) = &self.inner.base_url else {
            return paginate(self.inner.fixtures.reviews_for(product_id), page, limit).into();
        };

        let cache_key = CacheKey::Reviews {
            product: product_id.to_string(),
            page,
            limit,
        };
        if let Some(CacheValue::Reviews(reviews)) = self.inner.short_cache.get(&cache_key).await {
            debug!("Cache hit for reviews");
            return reviews;
        }

        let result = async {
            let request = self
                .request(base, Method::GET, &["products", product_id.as_str(), "reviews"], None)?
                .query(&[("page", page), ("limit", limit)]);
            Self::send_json::<ReviewPage>(request).await
        }
        .await;

        match result {
            Ok(reviews) => {
                self.inner
                    .short_cache
                    .insert(cache_key, CacheValue::Reviews(reviews.clone()))
                    .await;
                reviews
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch reviews");
                ReviewPage::empty()
            }
        }
    }

    /// Submit a validated review.
    ///
    /// Cached review pages for the product are dropped so the new review
    /// shows up on the next read.
    ///
    /// # Errors
    ///
    /// Returns the backend error, with its message, if the review is rejected.
    #[instrument(skip(self, review), fields(product_id = %product_id, rating = review.rating))]
    pub async fn submit_review(
        &self,
        product_id: &ProductId,
        review: &ReviewSubmission,
    ) -> Result<Review, ApiError> {
        let Some(base) = &self.inner.base_url else {
            debug!("Accepting review in fixture mode");
            return Ok(Review {
                id: ReviewId::new(Uuid::new_v4().to_string()),
                product_id: product_id.clone(),
                rating: review.rating,
                title: review.title.clone(),
                comment: review.comment.clone(),
                name: review.name.clone(),
                email: review.email.clone(),
                helpful_count: 0,
                created_at: Utc::now(),
            });
        };

        let request = self
            .request(base, Method::POST, &["products", product_id.as_str(), "reviews"], None)?
            .json(review);
        let created = Self::send_json::<Review>(request).await?;

        let product = product_id.to_string();
        if let Err(e) = self.inner.short_cache.invalidate_entries_if(move |key, _| {
            matches!(key, CacheKey::Reviews { product: p, .. } if *p == product)
        }) {
            warn!(error = %e, "Failed to invalidate cached reviews");
        }

        Ok(created)
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` when the fixture account does not match,
    /// or the backend error when the backend rejects the login.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthSession, ApiError> {
        let Some(base) = &self.inner.base_url else {
            return match &self.inner.fixtures.account {
                Some(account) if account.verify(email, password) => Ok(AuthSession {
                    user: account.profile.clone(),
                    token: None,
                }),
                _ => Err(ApiError::InvalidCredentials),
            };
        };

        let request = self
            .request(base, Method::POST, &["auth", "login"], None)?
            .json(&CredentialsBody {
                email,
                password: password.expose_secret(),
            });
        Self::send_json(request).await
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns the backend error (e.g. email already registered).
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<AuthSession, ApiError> {
        let Some(base) = &self.inner.base_url else {
            return Ok(AuthSession {
                user: UserProfile {
                    id: UserId::new(Uuid::new_v4().to_string()),
                    first_name: registration.first_name.clone(),
                    last_name: registration.last_name.clone(),
                    email: registration.email.clone(),
                    phone: None,
                    avatar_url: None,
                    created_at: Utc::now(),
                    last_login_at: None,
                    order_count: 0,
                },
                token: None,
            });
        };

        let request = self
            .request(base, Method::POST, &["auth", "register"], None)?
            .json(&RegisterBody {
                first_name: &registration.first_name,
                last_name: &registration.last_name,
                email: registration.email.as_str(),
                password: registration.password.expose_secret(),
            });
        Self::send_json(request).await
    }

    /// End the backend session.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    #[instrument(skip(self, token))]
    pub async fn logout(&self, token: Option<&SecretString>) -> Result<(), ApiError> {
        let Some(base) = &self.inner.base_url else {
            return Ok(());
        };
        let request = self.request(base, Method::POST, &["auth", "logout"], token)?;
        Self::send(request).await.map(|_| ())
    }

    // =========================================================================
    // Account
    // =========================================================================

    /// The signed-in user's profile. `None` when unavailable.
    #[instrument(skip(self, token))]
    pub async fn user_profile(&self, token: Option<&SecretString>) -> Option<UserProfile> {
        let Some(base) = &self.inner.base_url else {
            return self
                .inner
                .fixtures
                .account
                .as_ref()
                .map(|account| account.profile.clone());
        };

        let result = async {
            let request = self.request(base, Method::GET, &["user"], token)?;
            Self::send_json::<UserProfile>(request).await
        }
        .await;

        result
            .map_err(|e| warn!(error = %e, "Failed to fetch user profile"))
            .ok()
    }

    /// Update the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    #[instrument(skip(self, token, update))]
    pub async fn update_profile(
        &self,
        token: Option<&SecretString>,
        update: &ProfileUpdate,
    ) -> Result<(), ApiError> {
        let Some(base) = &self.inner.base_url else {
            debug!("Accepting profile update in fixture mode");
            return Ok(());
        };
        let request = self
            .request(base, Method::PATCH, &["user", "profile"], token)?
            .json(update);
        Self::send(request).await.map(|_| ())
    }

    /// One page of the user's orders. Empty when the backend fails.
    #[instrument(skip(self, token))]
    pub async fn orders(&self, token: Option<&SecretString>, page: u32, limit: u32) -> OrderPage {
        let Some(base) = &self.inner.base_url else {
            return paginate(self.inner.fixtures.orders.clone(), page, limit).into();
        };

        let result = async {
            let request = self
                .request(base, Method::GET, &["user", "orders"], token)?
                .query(&[("page", page), ("limit", limit)]);
            Self::send_json::<OrderPage>(request).await
        }
        .await;

        result.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to fetch orders");
            OrderPage::empty()
        })
    }

    /// A single order. `None` when missing or the backend fails.
    #[instrument(skip(self, token), fields(order_id = %order_id))]
    pub async fn order_by_id(
        &self,
        token: Option<&SecretString>,
        order_id: &OrderId,
    ) -> Option<Order> {
        let Some(base) = &self.inner.base_url else {
            return self.inner.fixtures.order(order_id);
        };

        let result = async {
            let request =
                self.request(base, Method::GET, &["user", "orders", order_id.as_str()], token)?;
            Self::send_json::<Order>(request).await
        }
        .await;

        match result {
            Ok(order) => Some(order),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                warn!(error = %e, "Failed to fetch order");
                None
            }
        }
    }

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns the backend error (e.g. an item went out of stock).
    #[instrument(skip(self, token, order), fields(lines = order.items.len(), total = %order.total))]
    pub async fn create_order(
        &self,
        token: Option<&SecretString>,
        order: &OrderRequest,
    ) -> Result<OrderConfirmation, ApiError> {
        let Some(base) = &self.inner.base_url else {
            let number: u32 = rand::rng().random_range(10_000..100_000);
            return Ok(OrderConfirmation {
                order_id: OrderId::new(Uuid::new_v4().to_string()),
                order_number: format!("ORD-{number}"),
            });
        };

        let request = self
            .request(base, Method::POST, &["orders"], token)?
            .json(order);
        Self::send_json(request).await
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// The user's saved products on the backend. Empty in fixture mode.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    #[instrument(skip(self, token))]
    pub async fn wishlist(&self, token: Option<&SecretString>) -> Result<Vec<Product>, ApiError> {
        let Some(base) = &self.inner.base_url else {
            return Ok(Vec::new());
        };
        let request = self.request(base, Method::GET, &["user", "wishlist"], token)?;
        Self::send_json(request).await
    }

    /// Save a product on the backend.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn add_to_wishlist(
        &self,
        token: Option<&SecretString>,
        product_id: &ProductId,
    ) -> Result<(), ApiError> {
        let Some(base) = &self.inner.base_url else {
            return Ok(());
        };
        let request = self
            .request(base, Method::POST, &["user", "wishlist"], token)?
            .json(&WishlistBody { product_id });
        Self::send(request).await.map(|_| ())
    }

    /// Remove a saved product on the backend.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn remove_from_wishlist(
        &self,
        token: Option<&SecretString>,
        product_id: &ProductId,
    ) -> Result<(), ApiError> {
        let Some(base) = &self.inner.base_url else {
            return Ok(());
        };
        let request = self.request(
            base,
            Method::DELETE,
            &["user", "wishlist", product_id.as_str()],
            token,
        )?;
        Self::send(request).await.map(|_| ())
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// One page of notifications, falling back to fixtures on failure.
    #[instrument(skip(self, token))]
    pub async fn notifications(
        &self,
        token: Option<&SecretString>,
        page: u32,
        limit: u32,
    ) -> NotificationPage {
        let Some(base) = &self.inner.base_url else {
            return self.fixture_notifications(page, limit);
        };

        let result = async {
            let request = self
                .request(base, Method::GET, &["user", "notifications"], token)?
                .query(&[("page", page), ("limit", limit)]);
            Self::send_json::<NotificationPage>(request).await
        }
        .await;

        result.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to fetch notifications, using fixtures");
            self.fixture_notifications(page, limit)
        })
    }

    fn fixture_notifications(&self, page: u32, limit: u32) -> NotificationPage {
        let notifications: Vec<Notification> = self.inner.fixtures.notifications.clone();
        paginate(notifications, page, limit).into()
    }

    /// Persist a read mark on the backend.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    #[instrument(skip(self, token), fields(notification_id = %id))]
    pub async fn mark_notification_read(
        &self,
        token: Option<&SecretString>,
        id: &NotificationId,
    ) -> Result<(), ApiError> {
        let Some(base) = &self.inner.base_url else {
            return Ok(());
        };
        let request = self
            .request(base, Method::PATCH, &["user", "notifications", id.as_str()], token)?
            .json(&ReadBody { read: true });
        Self::send(request).await.map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vitrine_core::SortOrder;

    use super::*;
    use crate::api::FixtureAccount;

    fn product(i: u32) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": format!("product-{i}"),
            "name": format!("Product {i}"),
            "slug": format!("product-{i}"),
            "price": 10 * i,
            "stock": 5,
            "reviewCount": i,
            "categoryId": "category-1",
            "category": { "id": "category-1", "name": "Category 1", "slug": "category-1" },
            "featured": i % 2 == 0,
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    fn profile() -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "id": "user-1",
            "firstName": "Demo",
            "lastName": "Shopper",
            "email": "demo@example.com",
            "createdAt": "2026-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    fn fixture_client() -> ApiClient {
        let fixtures = Fixtures {
            products: (1..=10).map(product).collect(),
            account: Some(FixtureAccount::new(profile(), "hunter2hunter2")),
            ..Fixtures::default()
        };
        ApiClient::new(&BackendConfig::fixtures(), fixtures).unwrap()
    }

    /// A backend URL nothing listens on.
    fn unreachable_client() -> ApiClient {
        let config = BackendConfig {
            base_url: Some(Url::parse("http://127.0.0.1:9/api/").unwrap()),
            use_fixtures: false,
            timeout: Duration::from_millis(500),
            ..BackendConfig::fixtures()
        };
        let fixtures = Fixtures {
            products: (1..=10).map(product).collect(),
            ..Fixtures::default()
        };
        ApiClient::new(&config, fixtures).unwrap()
    }

    #[tokio::test]
    async fn test_fixture_listing_and_lookup() {
        let client = fixture_client();
        assert!(client.is_fixture_mode());

        let page = client
            .products(&ProductQuery {
                limit: 3,
                sort: SortOrder::PriceHigh,
                ..ProductQuery::default()
            })
            .await;
        assert_eq!(page.total_products, 10);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.products.first().unwrap().id.as_str(), "product-10");

        assert!(client.product_by_slug("product-3").await.is_some());
        assert!(client.product_by_slug("missing").await.is_none());
        assert_eq!(client.featured_products().await.len(), 5);
    }

    #[tokio::test]
    async fn test_fixture_login() {
        let client = fixture_client();
        let session = client
            .login("demo@example.com", &SecretString::from("hunter2hunter2"))
            .await
            .unwrap();
        assert_eq!(session.user.id.as_str(), "user-1");

        let err = client
            .login("demo@example.com", &SecretString::from("wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_fixture_order_number_format() {
        let client = fixture_client();
        let cart = vitrine_core::Cart::new();
        let totals = cart.totals(&vitrine_core::CartPolicy::default());
        let confirmation = client
            .create_order(None, &OrderRequest::from_cart(&cart, &totals))
            .await
            .unwrap();
        let digits = confirmation.order_number.strip_prefix("ORD-").unwrap();
        assert_eq!(digits.len(), 5);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_unreachable_backend_falls_back() {
        let client = unreachable_client();
        assert!(!client.is_fixture_mode());

        let page = client.products(&ProductQuery::default()).await;
        assert_eq!(page.total_products, 10);
        assert!(client.product_by_slug("product-1").await.is_none());
        assert!(client.related_products(&product(1)).await.is_empty());
        assert_eq!(
            client.reviews(&ProductId::new("product-1"), 1, 5).await,
            ReviewPage::empty()
        );
        assert!(client.check_backend().await.is_err());
    }

    #[tokio::test]
    async fn test_unreachable_backend_propagates_mutation_errors() {
        let client = unreachable_client();
        let err = client
            .add_to_wishlist(None, &ProductId::new("product-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }
}
