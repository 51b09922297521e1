//! HTTP route handlers for the storefront.
//!
//! Every route speaks JSON. Cart, wishlist and notification read marks
//! are kept in the visitor's session.
//!
//! # Route Structure
//!
//! ```text
//! GET   /                              - Home page (banners, categories, featured)
//! GET   /health                        - Liveness check
//! GET   /health/ready                  - Backend reachability check
//!
//! # Catalogue
//! GET   /categories                    - Category list
//! GET   /products                      - Product listing (filter, sort, paginate)
//! GET   /products/{slug}               - Product detail with related products
//! GET   /products/{id}/reviews         - Review page
//! POST  /products/{id}/reviews         - Submit a review
//!
//! # Cart
//! GET   /cart                          - Cart with totals
//! POST  /cart/add                      - Add a product by slug
//! POST  /cart/update                   - Set a line quantity
//! POST  /cart/remove                   - Remove a line
//! POST  /cart/clear                    - Empty the cart
//! GET   /cart/count                    - Cart count badge
//! POST  /checkout                      - Place an order from the cart
//!
//! # Wishlist
//! GET   /wishlist                      - Saved products
//! POST  /wishlist/add                  - Save a product by slug
//! POST  /wishlist/remove               - Remove a saved product
//! POST  /wishlist/toggle               - Save or remove by slug
//! GET   /wishlist/count                - Wishlist count badge
//!
//! # Auth
//! POST  /auth/login                    - Sign in
//! POST  /auth/register                 - Create an account and sign in
//! POST  /auth/logout                   - Sign out
//!
//! # Account (requires auth)
//! GET   /account                       - Profile overview
//! PATCH /account/profile               - Update profile fields
//! GET   /account/orders                - Order history
//! GET   /account/orders/{id}           - Order detail
//!
//! # Notifications (requires auth)
//! GET   /notifications                 - Notification page with unread count
//! POST  /notifications/{id}/read       - Mark one read
//! POST  /notifications/read-all        - Mark all read
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod home;
pub mod notifications;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, patch, post},
};
use serde::Deserialize;
use vitrine_core::listing::clamp_limit;

use crate::state::AppState;

/// `page`/`limit` query parameters for paged account and review lists.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    /// 1-based page number. Missing or zero means the first page.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, falling back to `default`, clamped to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn limit_or(&self, default: u32) -> u32 {
        clamp_limit(self.limit.unwrap_or(default))
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    // Both routes share one parameter name; the detail route takes a slug,
    // the review routes take a product ID.
    Router::new()
        .route("/", get(products::index))
        .route("/{product}", get(products::show))
        .route(
            "/{product}/reviews",
            get(products::reviews).post(products::submit_review),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
        .route("/toggle", post(wishlist::toggle))
        .route("/count", get(wishlist::count))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/profile", patch(account::update_profile))
        .route("/orders", get(account::orders))
        .route("/orders/{id}", get(account::order))
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::index))
        .route("/read-all", post(notifications::mark_all_read))
        .route("/{id}/read", post(notifications::mark_read))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/categories", get(home::categories))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
        .nest("/wishlist", wishlist_routes())
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
        .nest("/notifications", notification_routes())
}
