//! Notification inbox bookkeeping.
//!
//! The backend is the source of the notification list, but read marks are
//! applied locally first so the inbox updates even when the backend call to
//! persist them fails. Callers keep the locally-read IDs and overlay them on
//! every freshly fetched list with [`NotificationInbox::apply_read_overlay`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::Notification;
use crate::types::NotificationId;

/// A list of notifications with read/unread accounting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationInbox {
    notifications: Vec<Notification>,
}

impl NotificationInbox {
    #[must_use]
    pub const fn new(notifications: Vec<Notification>) -> Self {
        Self { notifications }
    }

    #[must_use]
    pub fn into_notifications(self) -> Vec<Notification> {
        self.notifications
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    #[must_use]
    pub fn contains(&self, id: &NotificationId) -> bool {
        self.notifications.iter().any(|n| &n.id == id)
    }

    /// Mark one notification read.
    ///
    /// Returns `None` if `id` is not in the inbox, otherwise whether it was
    /// unread before.
    pub fn mark_read(&mut self, id: &NotificationId) -> Option<bool> {
        let notification = self.notifications.iter_mut().find(|n| &n.id == id)?;
        let was_unread = !notification.read;
        notification.read = true;
        Some(was_unread)
    }

    /// Mark everything read, returning the IDs that were unread.
    pub fn mark_all_read(&mut self) -> Vec<NotificationId> {
        self.notifications
            .iter_mut()
            .filter(|n| !n.read)
            .map(|n| {
                n.read = true;
                n.id.clone()
            })
            .collect()
    }

    /// Mark every notification whose ID appears in `read_ids` as read.
    pub fn apply_read_overlay<'a>(
        &mut self,
        read_ids: impl IntoIterator<Item = &'a NotificationId>,
    ) {
        let read: HashSet<&NotificationId> = read_ids.into_iter().collect();
        if read.is_empty() {
            return;
        }
        for notification in &mut self.notifications {
            if read.contains(&notification.id) {
                notification.read = true;
            }
        }
    }
}
