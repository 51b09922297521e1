//! Types held in the client session.

pub mod session;

pub use session::{CurrentUser, keys as session_keys};
