//! Entity records exchanged with the backend API.
//!
//! These are plain data: the only rules they carry are which fields are
//! optional. Wire field names are camelCase.

pub mod catalog;
pub mod notification;
pub mod order;
pub mod review;
pub mod user;

pub use catalog::{Banner, Category, Product, Specification, Variant};
pub use notification::Notification;
pub use order::{Address, Order, OrderConfirmation, OrderItem};
pub use review::{Review, ReviewError, ReviewSubmission};
pub use user::{ProfileUpdate, UserProfile};
