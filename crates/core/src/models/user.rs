//! Customer profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Email, UserId};

/// The signed-in customer's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub order_count: u32,
}

impl UserProfile {
    /// "First Last", trimmed.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
    }
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "id": "user-1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "createdAt": "2026-01-01T00:00:00Z",
            "orderCount": 5
        }))
        .unwrap()
    }

    #[test]
    fn test_display_name() {
        assert_eq!(profile().display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_apply_partial_update() {
        let mut profile = profile();
        profile.apply(ProfileUpdate {
            last_name: Some("Byron".to_string()),
            phone: Some("+1 555 0100".to_string()),
            ..ProfileUpdate::default()
        });
        assert_eq!(profile.first_name, "Ada");
        assert_eq!(profile.last_name, "Byron");
        assert_eq!(profile.phone.as_deref(), Some("+1 555 0100"));
    }

    #[test]
    fn test_empty_update() {
        assert!(ProfileUpdate::default().is_empty());
    }
}
