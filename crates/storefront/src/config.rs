//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; with none set the storefront serves the
//! fixture catalogue on 127.0.0.1:3000.
//!
//! ## Server
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: http://localhost:3000)
//!
//! ## Backend API
//! - `STOREFRONT_API_URL` - Backend base URL, e.g. `https://api.example.com/api`.
//!   When unset the storefront runs in fixture mode.
//! - `STOREFRONT_API_TOKEN` - Service token sent as a bearer token (validated for strength)
//! - `STOREFRONT_USE_FIXTURES` - Force fixture mode even when a URL is set (default: false)
//! - `STOREFRONT_API_TIMEOUT_SECS` - Per-request timeout (default: 5)
//! - `STOREFRONT_FIXTURES_PATH` - JSON fixture file (default: bundled demo catalogue)
//!
//! ## Cart pricing
//! - `STOREFRONT_FREE_SHIPPING_THRESHOLD` - default 50.00
//! - `STOREFRONT_FLAT_SHIPPING` - default 5.99
//! - `STOREFRONT_TAX_RATE` - default 0.08
//!
//! ## Error tracking
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`
//! - `SENTRY_SAMPLE_RATE` (default 1.0), `SENTRY_TRACES_SAMPLE_RATE` (default 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;
use vitrine_core::{CartPolicy, Price};

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_API_TIMEOUT_SECS: u64 = 5;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Backend API configuration
    pub api: BackendConfig,
    /// Pricing rules for cart totals
    pub cart_policy: CartPolicy,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Backend API configuration.
///
/// Implements `Debug` manually to redact the service token.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL of the backend; `None` means fixture mode.
    pub base_url: Option<Url>,
    /// Serve fixtures even when `base_url` is set.
    pub use_fixtures: bool,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Service bearer token for anonymous requests.
    pub access_token: Option<SecretString>,
    /// Fixture data file.
    pub fixtures_path: Option<PathBuf>,
}

impl BackendConfig {
    /// Fixture-only configuration with no backend.
    #[must_use]
    pub const fn fixtures() -> Self {
        Self {
            base_url: None,
            use_fixtures: true,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            access_token: None,
            fixtures_path: None,
        }
    }

    /// The backend URL to call, or `None` when fixtures should be served.
    #[must_use]
    pub fn remote_url(&self) -> Option<&Url> {
        if self.use_fixtures {
            return None;
        }
        self.base_url.as_ref()
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .field("use_fixtures", &self.use_fixtures)
            .field("timeout", &self.timeout)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("fixtures_path", &self.fixtures_path)
            .finish()
    }
}

/// Sentry configuration.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    /// Sentry DSN; tracking is disabled when unset.
    pub dsn: Option<String>,
    /// Environment tag (e.g. "production").
    pub environment: Option<String>,
    /// Error event sample rate.
    pub sample_rate: f32,
    /// Performance trace sample rate.
    pub traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if the
    /// service token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: get_parsed_env("STOREFRONT_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?,
            port: get_parsed_env("STOREFRONT_PORT", 3000)?,
            base_url: get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000"),
            api: BackendConfig::from_env()?,
            cart_policy: cart_policy_from_env()?,
            sentry: SentryConfig::from_env()?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should be marked `Secure`.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_optional_env("STOREFRONT_API_URL")
            .map(|raw| parse_api_url(&raw))
            .transpose()?;

        let timeout_secs = match get_optional_env("STOREFRONT_API_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_API_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            None => DEFAULT_API_TIMEOUT_SECS,
        };

        let access_token = match get_optional_env("STOREFRONT_API_TOKEN") {
            Some(value) => {
                validate_secret_strength(&value, "STOREFRONT_API_TOKEN")?;
                Some(SecretString::from(value))
            }
            None => None,
        };

        Ok(Self {
            base_url,
            use_fixtures: get_bool_env("STOREFRONT_USE_FIXTURES")?,
            timeout: Duration::from_secs(timeout_secs),
            access_token,
            fixtures_path: get_optional_env("STOREFRONT_FIXTURES_PATH").map(PathBuf::from),
        })
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: get_parsed_env("SENTRY_SAMPLE_RATE", 1.0)?,
            traces_sample_rate: get_parsed_env("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }
}

fn cart_policy_from_env() -> Result<CartPolicy, ConfigError> {
    let defaults = CartPolicy::default();
    Ok(CartPolicy {
        free_shipping_threshold: get_decimal_env("STOREFRONT_FREE_SHIPPING_THRESHOLD")?
            .map_or(defaults.free_shipping_threshold, Price::new),
        flat_shipping: get_decimal_env("STOREFRONT_FLAT_SHIPPING")?
            .map_or(defaults.flat_shipping, Price::new),
        tax_rate: get_decimal_env("STOREFRONT_TAX_RATE")?.unwrap_or(defaults.tax_rate),
    })
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable or fall back to `default`.
fn get_parsed_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse an optional decimal environment variable.
fn get_decimal_env(key: &str) -> Result<Option<Decimal>, ConfigError> {
    get_optional_env(key)
        .map(|raw| {
            let value = Decimal::from_str(raw.trim())
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
            if value.is_sign_negative() {
                return Err(ConfigError::InvalidEnvVar(
                    key.to_string(),
                    "must not be negative".to_string(),
                ));
            }
            Ok(value)
        })
        .transpose()
}

/// Parse a boolean flag (`true`/`false`, `1`/`0`, `yes`/`no`).
fn get_bool_env(key: &str) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(false), |raw| parse_bool(&raw).ok_or_else(|| {
        ConfigError::InvalidEnvVar(key.to_string(), format!("expected a boolean, got '{raw}'"))
    }))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse the backend URL, ensuring a trailing slash so relative joins keep the path.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&normalized)
        .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_API_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "STOREFRONT_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API tokens have high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated token."
            ),
        ));
    }

    Ok(())
}
