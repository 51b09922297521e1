//! Session-related types.
//!
//! Types stored in the session for authentication state and the
//! client-held collections.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use vitrine_core::{UserId, UserProfile};

/// Session-stored user identity.
///
/// Holds the profile returned at login so account pages work even when
/// the backend cannot be reached, plus the backend bearer token if one
/// was issued.
#[derive(Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub profile: UserProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
}

impl CurrentUser {
    #[must_use]
    pub const fn new(profile: UserProfile, access_token: Option<String>) -> Self {
        Self {
            profile,
            access_token,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.profile.id
    }

    /// Bearer token for user-scoped backend calls.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.access_token.clone().map(SecretString::from)
    }
}

impl std::fmt::Debug for CurrentUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentUser")
            .field("id", &self.profile.id)
            .field("email", &self.profile.email)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the client's cart.
    pub const CART: &str = "cart";

    /// Key for the client's wishlist.
    pub const WISHLIST: &str = "wishlist";

    /// Key for notification IDs marked read locally.
    pub const NOTIFICATIONS_READ: &str = "notifications_read";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn profile() -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "id": "user-1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "createdAt": "2026-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_debug_redacts_token() {
        let user = CurrentUser::new(profile(), Some("tok_live_abc123".to_string()));
        let debug = format!("{user:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("tok_live_abc123"));
        assert_eq!(user.token().unwrap().expose_secret(), "tok_live_abc123");
    }

    #[test]
    fn test_session_round_trip_without_token() {
        let user = CurrentUser::new(profile(), None);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("access_token").is_none());
        let back: CurrentUser = serde_json::from_value(json).unwrap();
        assert_eq!(back.id().as_str(), "user-1");
        assert!(back.token().is_none());
    }
}
