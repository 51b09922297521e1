//! Notification route handlers.
//!
//! Read marks are recorded in the session before the backend is told, so
//! the inbox reflects them even when the backend call fails. Only IDs found
//! unread in the user's inbox are recorded.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;
use vitrine_core::listing::MAX_LIMIT;
use vitrine_core::{Notification, NotificationId, NotificationInbox, NotificationPage};

use crate::api::DEFAULT_NOTIFICATION_LIMIT;
use crate::client_state::{load_read_marks, save_read_marks};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::routes::PageQuery;
use crate::state::AppState;

/// Notification page with unread accounting.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsView {
    pub notifications: Vec<Notification>,
    pub total_notifications: usize,
    pub total_pages: usize,
    pub unread_count: usize,
}

/// Result of marking notifications read.
#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub marked: usize,
}

/// Fetch a page and overlay this client's read marks.
async fn fetch_inbox(
    state: &AppState,
    session: &Session,
    user: &CurrentUser,
    page: u32,
    limit: u32,
) -> (NotificationInbox, NotificationPage) {
    let token = user.token();
    let mut fetched = state.api().notifications(token.as_ref(), page, limit).await;
    let marks = load_read_marks(session).await;

    let mut inbox = NotificationInbox::new(std::mem::take(&mut fetched.notifications));
    inbox.apply_read_overlay(&marks);
    (inbox, fetched)
}

/// Find the inbox page holding `id`, scanning pages of [`MAX_LIMIT`].
async fn inbox_holding(
    state: &AppState,
    session: &Session,
    user: &CurrentUser,
    id: &NotificationId,
) -> Option<NotificationInbox> {
    let mut page = 1_u32;
    loop {
        let (inbox, fetched) = fetch_inbox(state, session, user, page, MAX_LIMIT).await;
        if inbox.contains(id) {
            return Some(inbox);
        }
        if inbox.is_empty() || page as usize >= fetched.total_pages {
            return None;
        }
        page += 1;
    }
}

/// Tell the backend, logging rather than failing when it refuses.
async fn persist_read(state: &AppState, user: &CurrentUser, id: &NotificationId) {
    let token = user.token();
    if let Err(e) = state.api().mark_notification_read(token.as_ref(), id).await {
        tracing::warn!(notification_id = %id, error = %e, "Failed to mark notification read");
    }
}

/// List notifications.
#[instrument(skip(state, session, user))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Query(page): Query<PageQuery>,
) -> Json<NotificationsView> {
    let (inbox, fetched) = fetch_inbox(
        &state,
        &session,
        &user,
        page.page(),
        page.limit_or(DEFAULT_NOTIFICATION_LIMIT),
    )
    .await;

    Json(NotificationsView {
        unread_count: inbox.unread_count(),
        notifications: inbox.into_notifications(),
        total_notifications: fetched.total_notifications,
        total_pages: fetched.total_pages,
    })
}

/// Mark one notification read.
#[instrument(skip(state, session, user))]
pub async fn mark_read(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<MarkedRead>> {
    let id = NotificationId::new(id);

    let Some(mut inbox) = inbox_holding(&state, &session, &user, &id).await else {
        return Err(AppError::NotFound("Notification".to_string()));
    };
    if inbox.mark_read(&id) != Some(true) {
        return Ok(Json(MarkedRead { marked: 0 }));
    }

    let mut marks = load_read_marks(&session).await;
    marks.insert(id.clone());
    save_read_marks(&session, &marks).await?;

    persist_read(&state, &user, &id).await;

    Ok(Json(MarkedRead { marked: 1 }))
}

/// Mark every unread notification read.
#[instrument(skip(state, session, user))]
pub async fn mark_all_read(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<Json<MarkedRead>> {
    let (mut inbox, _) = fetch_inbox(&state, &session, &user, 1, MAX_LIMIT).await;
    let unread = inbox.mark_all_read();

    let mut marks = load_read_marks(&session).await;
    marks.extend(unread.iter().cloned());
    save_read_marks(&session, &marks).await?;

    for id in &unread {
        persist_read(&state, &user, id).await;
    }

    tracing::debug!(count = unread.len(), "Marked all notifications read");
    Ok(Json(MarkedRead {
        marked: unread.len(),
    }))
}
