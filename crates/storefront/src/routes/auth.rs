//! Authentication route handlers.
//!
//! Handles login, registration and logout against the backend (or the
//! fixture account). The signed-in user is kept in the session.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use vitrine_core::{Email, UserProfile};

use crate::api::{AuthSession, Registration};
use crate::client_state::{load_wishlist, save_wishlist};
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Request Types
// =============================================================================

/// Login request.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration request.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: Option<String>,
}

/// Signed-in user response.
#[derive(Debug, Serialize)]
pub struct SignedIn {
    pub user: UserProfile,
}

fn validate_password(password: &str, confirm: Option<&str>) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if confirm.is_some_and(|confirm| confirm != password) {
        return Err(AppError::BadRequest("Passwords do not match".to_string()));
    }
    Ok(())
}

/// Store the session user and pull any wishlist saved on the backend.
async fn sign_in(state: &AppState, session: &Session, auth: AuthSession) -> Result<UserProfile> {
    let user = CurrentUser::new(auth.user, auth.token);
    set_current_user(session, &user).await?;
    set_sentry_user(user.id(), Some(user.profile.email.as_str()));

    let token = user.token();
    match state.api().wishlist(token.as_ref()).await {
        Ok(saved) if !saved.is_empty() => {
            let mut wishlist = load_wishlist(session).await;
            for product in saved {
                wishlist.add(product);
            }
            save_wishlist(session, &wishlist).await?;
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Failed to load saved wishlist"),
    }

    tracing::info!(user_id = %user.id(), "User signed in");
    Ok(user.profile)
}

// =============================================================================
// Handlers
// =============================================================================

/// Sign in with email and password.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<SignedIn>> {
    if form.email.trim().is_empty() || form.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let password = SecretString::from(form.password);
    let auth = state.api().login(form.email.trim(), &password).await?;
    let user = sign_in(&state, &session, auth).await?;

    Ok(Json(SignedIn { user }))
}

/// Create an account and sign in.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<RegisterForm>,
) -> Result<Response> {
    let email = Email::parse(&form.email)
        .map_err(|e| AppError::BadRequest(format!("Invalid email address: {e}")))?;
    validate_password(&form.password, form.password_confirm.as_deref())?;

    let registration = Registration {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        email,
        password: SecretString::from(form.password),
    };
    let auth = state.api().register(&registration).await?;
    let user = sign_in(&state, &session, auth).await?;

    Ok((StatusCode::CREATED, Json(SignedIn { user })).into_response())
}

/// Sign out. The cart and wishlist stay with the client.
#[instrument(skip(state, session, user))]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<StatusCode> {
    if let Some(user) = user {
        let token = user.token();
        if let Err(e) = state.api().logout(token.as_ref()).await {
            tracing::warn!(error = %e, "Backend logout failed");
        }
        tracing::info!(user_id = %user.id(), "User signed out");
    }

    clear_current_user(&session).await?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password() {
        assert!(validate_password("short", None).is_err());
        assert!(validate_password("long enough", None).is_ok());
        assert!(validate_password("long enough", Some("long enough")).is_ok());
        assert!(validate_password("long enough", Some("different!")).is_err());
    }
}
