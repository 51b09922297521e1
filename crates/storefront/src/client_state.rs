//! Per-client persistence of the cart, wishlist and read marks.
//!
//! Each collection is stored whole under its own session key. A missing
//! key means an empty collection; a record that no longer deserializes is
//! logged, dropped and replaced by an empty collection.

use std::collections::BTreeSet;

use serde::{Serialize, de::DeserializeOwned};
use tower_sessions::Session;
use vitrine_core::{Cart, NotificationId, Wishlist};

use crate::error::Result;
use crate::models::session_keys;

async fn load_or_default<T>(session: &Session, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match session.get::<T>(key).await {
        Ok(value) => value.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding unreadable session data");
            if let Err(e) = session.remove_value(key).await {
                tracing::warn!(key, error = %e, "Failed to remove unreadable session data");
            }
            T::default()
        }
    }
}

async fn store<T: Serialize + Send + Sync>(session: &Session, key: &str, value: &T) -> Result<()> {
    session.insert(key, value).await?;
    Ok(())
}

/// The client's cart; empty when none has been saved.
pub async fn load_cart(session: &Session) -> Cart {
    load_or_default(session, session_keys::CART).await
}

/// Persist the client's cart.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    store(session, session_keys::CART, cart).await
}

/// The client's wishlist; empty when none has been saved.
pub async fn load_wishlist(session: &Session) -> Wishlist {
    load_or_default(session, session_keys::WISHLIST).await
}

/// Persist the client's wishlist.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn save_wishlist(session: &Session, wishlist: &Wishlist) -> Result<()> {
    store(session, session_keys::WISHLIST, wishlist).await
}

/// Notification IDs this client has marked read.
pub async fn load_read_marks(session: &Session) -> BTreeSet<NotificationId> {
    load_or_default(session, session_keys::NOTIFICATIONS_READ).await
}

/// Persist the notification read marks.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn save_read_marks(session: &Session, marks: &BTreeSet<NotificationId>) -> Result<()> {
    store(session, session_keys::NOTIFICATIONS_READ, marks).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_missing_collections_are_empty() {
        let session = session();
        assert!(load_cart(&session).await.is_empty());
        assert!(load_wishlist(&session).await.is_empty());
        assert!(load_read_marks(&session).await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_cart_is_replaced() {
        let session = session();
        session
            .insert(session_keys::CART, serde_json::json!({ "items": "garbage" }))
            .await
            .unwrap();

        assert!(load_cart(&session).await.is_empty());
        // The bad record is gone, so the next load is clean too
        assert!(
            session
                .get_value(session_keys::CART)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_read_marks_round_trip() {
        let session = session();
        let marks: BTreeSet<NotificationId> =
            [NotificationId::new("n-2"), NotificationId::new("n-1")].into();
        save_read_marks(&session, &marks).await.unwrap();
        assert_eq!(load_read_marks(&session).await, marks);
    }
}
