//! Signed-in user extractors and session helpers.
//!
//! The signed-in user is a [`CurrentUser`] record under
//! [`session_keys::CURRENT_USER`]; these helpers are the only writers.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// The user stored in this request's session, if any.
///
/// Missing sessions and undecodable records both read as signed out.
async fn session_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    match session.get::<CurrentUser>(session_keys::CURRENT_USER).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read signed-in user from session");
            None
        }
    }
}

/// Extractor for routes that need a signed-in user.
///
/// Rejects with `401` and a JSON error body otherwise.
pub struct RequireAuth(pub CurrentUser);

/// Rejection returned when nobody is signed in.
#[derive(Debug)]
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "Please sign in to continue" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_user(parts).await.map(Self).ok_or(AuthRejection)
    }
}

/// Extractor for routes that behave differently for signed-in users
/// (checkout, wishlist sync, logout) but serve guests too.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts).await))
    }
}

/// Store the signed-in user, rotating the session ID first.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Forget the signed-in user and their notification read marks.
///
/// Cart and wishlist stay with the client.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    session
        .remove::<serde_json::Value>(session_keys::NOTIFICATIONS_READ)
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::Request;
    use chrono::Utc;
    use tower_sessions::MemoryStore;
    use vitrine_core::{Email, UserId, UserProfile};

    use super::*;

    fn user() -> CurrentUser {
        CurrentUser::new(
            UserProfile {
                id: UserId::new("user-1"),
                first_name: "Demo".to_string(),
                last_name: "Shopper".to_string(),
                email: Email::parse("demo@vitrine.test").unwrap(),
                phone: None,
                avatar_url: None,
                created_at: Utc::now(),
                last_login_at: None,
                order_count: 0,
            },
            Some("token".to_string()),
        )
    }

    fn parts_with(session: &Session) -> Parts {
        let (mut parts, ()) = Request::new(()).into_parts();
        parts.extensions.insert(session.clone());
        parts
    }

    #[tokio::test]
    async fn test_require_auth() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let mut parts = parts_with(&session);
        assert!(RequireAuth::from_request_parts(&mut parts, &()).await.is_err());

        set_current_user(&session, &user()).await.unwrap();
        let RequireAuth(found) = RequireAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(found.id().as_str(), "user-1");
    }

    #[tokio::test]
    async fn test_optional_auth_without_session() {
        let (mut parts, ()) = Request::new(()).into_parts();
        let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_clear_current_user() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        set_current_user(&session, &user()).await.unwrap();
        session
            .insert(session_keys::NOTIFICATIONS_READ, vec!["n1"])
            .await
            .unwrap();

        clear_current_user(&session).await.unwrap();

        let mut parts = parts_with(&session);
        let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(user.is_none());
        assert!(
            session
                .get_value(session_keys::NOTIFICATIONS_READ)
                .await
                .unwrap()
                .is_none()
        );
    }
}
