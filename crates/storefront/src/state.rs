//! Application state shared across handlers.

use std::sync::Arc;

use vitrine_core::CartPolicy;

use crate::api::{ApiClient, ApiError, Fixtures};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the backend client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig, fixtures: Fixtures) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api, fixtures)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Pricing rules for cart totals.
    #[must_use]
    pub fn cart_policy(&self) -> &CartPolicy {
        &self.inner.config.cart_policy
    }
}
