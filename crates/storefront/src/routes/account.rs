//! Account route handlers. Every route requires a signed-in user.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;
use vitrine_core::{Order, OrderId, OrderPage, ProfileUpdate, UserProfile};

use crate::api::DEFAULT_ORDER_LIMIT;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::session_keys;
use crate::routes::PageQuery;
use crate::state::AppState;

/// Account overview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub profile: UserProfile,
    pub display_name: String,
}

/// Display the account overview.
///
/// Prefers the backend's copy of the profile; the copy stored at login is
/// used in fixture mode or when the backend has none for this user.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Json<AccountView> {
    let remote = if state.api().is_fixture_mode() {
        None
    } else {
        let token = user.token();
        state.api().user_profile(token.as_ref()).await
    };
    let profile = remote
        .filter(|profile| &profile.id == user.id())
        .unwrap_or(user.profile);

    Json(AccountView {
        display_name: profile.display_name(),
        profile,
    })
}

/// Update profile fields.
#[instrument(skip(state, session, user, update))]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(mut user): RequireAuth,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>> {
    if update.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }

    let token = user.token();
    state.api().update_profile(token.as_ref(), &update).await?;

    user.profile.apply(update);
    session
        .insert(session_keys::CURRENT_USER, &user)
        .await?;
    tracing::info!(user_id = %user.id(), "Profile updated");

    Ok(Json(user.profile))
}

/// Order history.
#[instrument(skip(state, user))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(page): Query<PageQuery>,
) -> Json<OrderPage> {
    let token = user.token();
    Json(
        state
            .api()
            .orders(token.as_ref(), page.page(), page.limit_or(DEFAULT_ORDER_LIMIT))
            .await,
    )
}

/// A single order.
#[instrument(skip(state, user))]
pub async fn order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<String>,
) -> Result<Json<Order>> {
    let token = user.token();
    state
        .api()
        .order_by_id(token.as_ref(), &OrderId::new(order_id))
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Order".to_string()))
}
