//! End-to-end tests for the Vitrine storefront.
//!
//! Each test starts the full storefront router on an ephemeral local port
//! and drives it over HTTP with a cookie-carrying client, so cart, wishlist
//! and sign-in state flow through the real session layer.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrine-integration-tests
//! ```
//!
//! # Backends
//!
//! - [`TestServer::fixtures`] serves the demo catalogue in `fixtures/catalog.json`.
//! - [`TestServer::with_backend`] points the storefront at a stub backend
//!   started with [`spawn_backend`].

#![allow(clippy::missing_panics_doc)]

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;
use vitrine_core::CartPolicy;
use vitrine_storefront::api::Fixtures;
use vitrine_storefront::config::{BackendConfig, SentryConfig, StorefrontConfig};
use vitrine_storefront::state::AppState;

/// Email of the demo account in the fixture catalogue.
pub const DEMO_EMAIL: &str = "demo@vitrine.test";

/// Password of the demo account in the fixture catalogue.
pub const DEMO_PASSWORD: &str = "window-shopping";

/// A base URL nothing listens on.
pub const UNREACHABLE_BACKEND: &str = "http://127.0.0.1:9/api/";

/// Path to the demo fixture catalogue.
#[must_use]
pub fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/catalog.json")
}

/// Load the demo fixture catalogue.
#[must_use]
pub fn demo_fixtures() -> Fixtures {
    Fixtures::load(Some(&fixtures_path())).expect("Failed to load demo fixtures")
}

/// Storefront configuration for tests.
#[must_use]
pub fn test_config(api: BackendConfig) -> StorefrontConfig {
    StorefrontConfig {
        host: Ipv4Addr::LOCALHOST.into(),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        api,
        cart_policy: CartPolicy::default(),
        sentry: SentryConfig::default(),
    }
}

/// Backend configuration pointing at `url`.
#[must_use]
pub fn remote_backend(url: Url) -> BackendConfig {
    BackendConfig {
        base_url: Some(url),
        use_fixtures: false,
        timeout: Duration::from_secs(2),
        ..BackendConfig::fixtures()
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server error");
    });

    addr
}

/// Start a stub backend and return its API base URL.
pub async fn spawn_backend(router: Router) -> Url {
    let addr = serve(Router::new().nest("/api", router)).await;
    Url::parse(&format!("http://{addr}/api/")).expect("Invalid backend URL")
}

/// A running storefront.
pub struct TestServer {
    base_url: String,
}

impl TestServer {
    /// Start a storefront with the given backend and fixtures.
    pub async fn start(api: BackendConfig, fixtures: Fixtures) -> Self {
        let state = AppState::new(test_config(api), fixtures).expect("Failed to build state");
        let addr = serve(vitrine_storefront::app(state)).await;

        Self {
            base_url: format!("http://{addr}"),
        }
    }

    /// Start a storefront serving the demo fixture catalogue.
    pub async fn fixtures() -> Self {
        Self::start(BackendConfig::fixtures(), demo_fixtures()).await
    }

    /// Start a storefront backed by `url`, falling back to the demo catalogue.
    pub async fn with_backend(url: Url) -> Self {
        Self::start(remote_backend(url), demo_fixtures()).await
    }

    /// A new visitor with its own cookie jar.
    #[must_use]
    pub fn visitor(&self) -> Visitor {
        Visitor {
            client: Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: self.base_url.clone(),
        }
    }
}

/// One browser-like client of the storefront.
pub struct Visitor {
    client: Client,
    base_url: String,
}

impl Visitor {
    /// GET `path` and decode the JSON body (`Value::Null` when empty).
    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("GET failed");
        read(response).await
    }

    /// POST a JSON body to `path`.
    pub async fn post(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .expect("POST failed");
        read(response).await
    }

    /// POST with no body.
    pub async fn post_empty(&self, path: &str) -> (StatusCode, Value) {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("POST failed");
        read(response).await
    }

    /// PATCH a JSON body to `path`.
    pub async fn patch(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let response = self
            .client
            .patch(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .expect("PATCH failed");
        read(response).await
    }

    /// Sign in as the demo account.
    pub async fn login_demo(&self) {
        let (status, _) = self
            .post(
                "/auth/login",
                &serde_json::json!({ "email": DEMO_EMAIL, "password": DEMO_PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "demo login failed");
    }
}

async fn read(response: reqwest::Response) -> (StatusCode, Value) {
    let status = response.status();
    let text = response.text().await.expect("Failed to read response");
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    (status, body)
}
