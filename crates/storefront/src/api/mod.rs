//! Backend REST API client.
//!
//! # Architecture
//!
//! - The backend is the source of truth; nothing is synced locally
//! - Reads fall back to the fixture catalogue when the backend fails
//! - Mutations propagate backend errors with the backend's own message
//! - In-memory caching via `moka` (1 hour for featured products, categories
//!   and banners; 5 minutes for listings, product detail and reviews)
//!
//! When no backend URL is configured, or `STOREFRONT_USE_FIXTURES` is set,
//! every call is answered from [`Fixtures`] without touching the network.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api, fixtures)?;
//!
//! let product = client.product_by_slug("product-1").await;
//! let page = client.products(&ProductQuery::default()).await;
//! ```

mod cache;
mod client;
pub mod fixtures;
pub mod types;

pub use client::{
    ApiClient, DEFAULT_NOTIFICATION_LIMIT, DEFAULT_ORDER_LIMIT, DEFAULT_REVIEW_LIMIT,
};
pub use fixtures::{FixtureAccount, FixtureError, Fixtures};
pub use types::{AuthSession, OrderLine, OrderRequest, Registration};

use thiserror::Error;

/// Message used when the backend gives no usable error body.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred while fetching data";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Login rejected.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl ApiError {
    /// Whether the backend reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Status { status: 404, .. })
    }

    /// Whether the failure was caused by the request rather than the backend.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 400 && *status < 500,
            Self::NotFound(_) | Self::InvalidCredentials => true,
            Self::Http(_) | Self::Parse(_) | Self::Url(_) => false,
        }
    }
}

/// Extract the user-facing message from an error response body.
///
/// A JSON `message` field wins; a body that is not JSON is used verbatim;
/// anything else yields [`DEFAULT_ERROR_MESSAGE`].
#[must_use]
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => json
            .get("message")
            .and_then(serde_json::Value::as_str)
            .filter(|message| !message.is_empty())
            .map_or_else(|| DEFAULT_ERROR_MESSAGE.to_string(), String::from),
        Err(_) if !body.trim().is_empty() => body.to_string(),
        Err(_) => DEFAULT_ERROR_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_json_message() {
        assert_eq!(error_message(r#"{"message":"Out of stock"}"#), "Out of stock");
    }

    #[test]
    fn test_error_message_json_without_message() {
        assert_eq!(error_message(r#"{"error":"nope"}"#), DEFAULT_ERROR_MESSAGE);
        assert_eq!(error_message(r#"{"message":""}"#), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn test_error_message_plain_text() {
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(""), DEFAULT_ERROR_MESSAGE);
        assert_eq!(error_message("   "), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn test_status_error_displays_backend_message() {
        let err = ApiError::Status {
            status: 422,
            message: "Email already registered".to_string(),
        };
        assert_eq!(err.to_string(), "Email already registered");
        assert!(err.is_client_error());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_classification() {
        assert!(ApiError::NotFound("product".to_string()).is_not_found());
        assert!(
            ApiError::Status {
                status: 404,
                message: DEFAULT_ERROR_MESSAGE.to_string()
            }
            .is_not_found()
        );
        let server = ApiError::Status {
            status: 503,
            message: "down".to_string(),
        };
        assert!(!server.is_client_error());
    }
}
