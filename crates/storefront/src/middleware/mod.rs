//! Request middleware and extractors.
//!
//! Layers as assembled by [`crate::app`], outermost first:
//!
//! 1. Sentry hub and transaction
//! 2. `TraceLayer` span (`request_id`, `status`, `latency_ms`)
//! 3. Request ID ([`request_id_middleware`])
//! 4. Session ([`create_session_layer`])
//!
//! [`RequireAuth`] and [`OptionalAuth`] read the signed-in user from the
//! session inside handlers.

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
pub use request_id::{RequestId, request_id_middleware};
pub use session::create_session_layer;
