//! Home page and category route handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;
use vitrine_core::{Banner, Category, Product};

use crate::state::AppState;

/// Home page data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub banners: Vec<Banner>,
    pub categories: Vec<Category>,
    pub featured_products: Vec<Product>,
}

/// Display the home page: banners, categories and featured products.
///
/// The three reads run concurrently; each falls back independently.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Json<HomePage> {
    let api = state.api();
    let (banners, categories, featured_products) =
        tokio::join!(api.banners(), api.categories(), api.featured_products());

    Json(HomePage {
        banners,
        categories,
        featured_products,
    })
}

/// List all categories.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.api().categories().await)
}
