//! Validated scalar types shared by the models.
//!
//! IDs are opaque string newtypes, [`Price`] is a decimal amount in the
//! store currency, [`Email`] is a normalized address, and the status enums
//! mirror the backend's lowercase wire values.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use status::*;
