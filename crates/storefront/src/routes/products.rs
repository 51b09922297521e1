//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use vitrine_core::{
    Price, Product, ProductId, ProductPage, ProductQuery, ReviewPage, ReviewSubmission,
    format::{Star, star_rating},
};

use crate::api::DEFAULT_REVIEW_LIMIT;
use crate::client_state::load_wishlist;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::routes::PageQuery;
use crate::state::AppState;

/// Product detail display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub product: Product,
    pub sale_price: Price,
    /// Formatted list price, e.g. `$49.99`.
    pub price: String,
    /// Formatted sale price, present only when discounted.
    pub compare_price: Option<String>,
    pub stars: [Star; 5],
    pub in_wishlist: bool,
    pub related: Vec<Product>,
}

impl ProductDetail {
    fn new(product: Product, related: Vec<Product>, in_wishlist: bool) -> Self {
        let sale_price = product.sale_price().round_cents();
        Self {
            price: product.price.display(),
            compare_price: product.is_on_sale().then(|| sale_price.display()),
            stars: star_rating(product.rating),
            sale_price,
            in_wishlist,
            related,
            product,
        }
    }
}

/// Display product listing.
///
/// Accepts the listing query string: `page`, `limit`, `sort`, `category`,
/// `minPrice`, `maxPrice`, `onSale`, `inStock`, `search`.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<ProductPage> {
    Json(state.api().products(&query).await)
}

/// Display a product with its related products.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetail>> {
    let product = state
        .api()
        .product_by_slug(&slug)
        .await
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

    let related = state.api().related_products(&product).await;
    let in_wishlist = load_wishlist(&session).await.contains(&product.id);

    add_breadcrumb(
        "navigation",
        "Viewed product",
        Some(&[("product_id", product.id.as_str())]),
    );

    Ok(Json(ProductDetail::new(product, related, in_wishlist)))
}

/// A page of reviews for a product.
#[instrument(skip(state))]
pub async fn reviews(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Json<ReviewPage> {
    let product_id = ProductId::new(product_id);
    Json(
        state
            .api()
            .reviews(&product_id, page.page(), page.limit_or(DEFAULT_REVIEW_LIMIT))
            .await,
    )
}

/// Review submission body.
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub rating: u8,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl From<ReviewForm> for ReviewSubmission {
    fn from(form: ReviewForm) -> Self {
        Self {
            rating: form.rating,
            title: form.title,
            comment: form.comment,
            name: form.name,
            email: form.email,
        }
    }
}

/// Submit a review for a product.
#[instrument(skip(state, form))]
pub async fn submit_review(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(form): Json<ReviewForm>,
) -> Result<Response> {
    let submission = ReviewSubmission::from(form).validate()?;
    let product_id = ProductId::new(product_id);

    let review = state.api().submit_review(&product_id, &submission).await?;
    tracing::info!(product_id = %product_id, review_id = %review.id, "Review submitted");

    Ok((StatusCode::CREATED, Json(review)).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(discount: u32) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name": "Lamp",
            "slug": "lamp",
            "price": "49.99",
            "discount": discount,
            "rating": 3.5,
            "categoryId": "c1",
            "category": { "id": "c1", "name": "Lighting", "slug": "lighting" },
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_detail_on_sale() {
        let detail = ProductDetail::new(product(10), Vec::new(), true);
        assert_eq!(detail.price, "$49.99");
        assert_eq!(detail.compare_price.as_deref(), Some("$44.99"));
        assert_eq!(
            detail.stars,
            [Star::Full, Star::Full, Star::Full, Star::Half, Star::Empty]
        );
        assert!(detail.in_wishlist);
    }

    #[test]
    fn test_detail_full_price() {
        let detail = ProductDetail::new(product(0), Vec::new(), false);
        assert!(detail.compare_price.is_none());
        assert_eq!(detail.sale_price, detail.product.price);
    }
}
