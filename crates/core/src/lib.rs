//! Vitrine Core - Shared domain types library.
//!
//! This crate provides the types used by the Vitrine storefront:
//! - catalogue entities (products, categories, variants, banners)
//! - account entities (profiles, orders, reviews, notifications)
//! - the client-held state containers (cart, wishlist, notification inbox)
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no persistence. Callers load and store the containers however
//! they like (the storefront keeps them in the visitor's session).
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses
//! - [`models`] - Plain entity records as exchanged with the backend API
//! - [`cart`] - Cart lines, line identity and derived totals
//! - [`wishlist`] - Saved products
//! - [`notifications`] - Read/unread bookkeeping
//! - [`listing`] - Product filtering, sorting and pagination
//! - [`format`] - Display helpers for currency, dates and ratings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod format;
pub mod listing;
pub mod models;
pub mod notifications;
pub mod types;
pub mod wishlist;

pub use cart::{Cart, CartError, CartItem, CartPolicy, CartTotals};
pub use listing::{
    NotificationPage, OrderPage, Page, ProductPage, ProductQuery, ReviewPage, SortOrder, paginate,
};
pub use models::*;
pub use notifications::NotificationInbox;
pub use types::*;
pub use wishlist::Wishlist;
