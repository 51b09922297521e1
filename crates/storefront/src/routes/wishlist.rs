//! Wishlist route handlers.
//!
//! The wishlist lives in the client's session. When a user is signed in
//! and a backend is configured, changes are also mirrored to the backend;
//! a failed mirror is logged and does not undo the local change.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use vitrine_core::{Product, ProductId, Wishlist};

use crate::client_state::{load_wishlist, save_wishlist};
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Wishlist display data.
#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub items: Vec<Product>,
    pub count: usize,
}

impl From<&Wishlist> for WishlistView {
    fn from(wishlist: &Wishlist) -> Self {
        Self {
            items: wishlist.items().to_vec(),
            count: wishlist.len(),
        }
    }
}

/// Result of a wishlist mutation.
#[derive(Debug, Serialize)]
pub struct WishlistChange {
    /// Whether the product is saved after the change.
    pub saved: bool,
    pub count: usize,
}

/// Wishlist count badge.
#[derive(Debug, Serialize)]
pub struct WishlistCount {
    pub count: usize,
}

/// Body naming a product by slug.
#[derive(Debug, Deserialize)]
pub struct SlugRequest {
    pub slug: String,
}

/// Body naming a product by ID.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductIdRequest {
    pub product_id: ProductId,
}

async fn find_product(state: &AppState, slug: &str) -> Result<Product> {
    state
        .api()
        .product_by_slug(slug)
        .await
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
}

/// Mirror a wishlist change to the backend for a signed-in user.
async fn sync_remote(
    state: &AppState,
    user: Option<&CurrentUser>,
    product_id: &ProductId,
    saved: bool,
) {
    let Some(user) = user else {
        return;
    };
    let token = user.token();
    let result = if saved {
        state.api().add_to_wishlist(token.as_ref(), product_id).await
    } else {
        state
            .api()
            .remove_from_wishlist(token.as_ref(), product_id)
            .await
    };
    if let Err(e) = result {
        tracing::warn!(product_id = %product_id, error = %e, "Failed to sync wishlist");
    }
}

/// Display the wishlist.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<WishlistView> {
    let wishlist = load_wishlist(&session).await;
    Json(WishlistView::from(&wishlist))
}

/// Wishlist count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<WishlistCount> {
    Json(WishlistCount {
        count: load_wishlist(&session).await.len(),
    })
}

/// Save a product. Saving an already saved product changes nothing.
#[instrument(skip(state, session, user))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Json(request): Json<SlugRequest>,
) -> Result<Json<WishlistChange>> {
    let product = find_product(&state, &request.slug).await?;
    let product_id = product.id.clone();

    let mut wishlist = load_wishlist(&session).await;
    if wishlist.add(product) {
        save_wishlist(&session, &wishlist).await?;
        sync_remote(&state, user.as_ref(), &product_id, true).await;
    }

    Ok(Json(WishlistChange {
        saved: true,
        count: wishlist.len(),
    }))
}

/// Remove a saved product.
#[instrument(skip(state, session, user))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Json(request): Json<ProductIdRequest>,
) -> Result<Json<WishlistChange>> {
    let mut wishlist = load_wishlist(&session).await;
    if wishlist.remove(&request.product_id) {
        save_wishlist(&session, &wishlist).await?;
        sync_remote(&state, user.as_ref(), &request.product_id, false).await;
    }

    Ok(Json(WishlistChange {
        saved: false,
        count: wishlist.len(),
    }))
}

/// Save the product if absent, remove it if present.
#[instrument(skip(state, session, user))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Json(request): Json<SlugRequest>,
) -> Result<Json<WishlistChange>> {
    let product = find_product(&state, &request.slug).await?;
    let product_id = product.id.clone();

    let mut wishlist = load_wishlist(&session).await;
    let saved = wishlist.toggle(product);
    save_wishlist(&session, &wishlist).await?;
    sync_remote(&state, user.as_ref(), &product_id, saved).await;

    Ok(Json(WishlistChange {
        saved,
        count: wishlist.len(),
    }))
}
