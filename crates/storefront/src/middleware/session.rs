//! Per-client session storage.
//!
//! Each visitor's cart, wishlist, read marks and sign-in live in one
//! in-memory session record keyed by the `vitrine_session` cookie. Records
//! vanish on restart.

use tower_sessions::cookie::{SameSite, time::Duration};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "vitrine_session";

/// Idle time after which a session is dropped.
const SESSION_IDLE_DAYS: i64 = 7;

/// Build the session layer.
///
/// The cookie is `Secure` only when the public base URL is HTTPS, so local
/// plain-HTTP development keeps working.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::days(SESSION_IDLE_DAYS)))
        .with_secure(config.is_https())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
