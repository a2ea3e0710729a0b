//! In-process notification centre shared through application state.
//!
//! Holds the newest [`MAX_NOTIFICATIONS`] notifications, newest first, and
//! fans each new one out to subscribers.

use crate::models::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;
use uuid::Uuid;

pub const MAX_NOTIFICATIONS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Addressee; `None` is visible to every role.
    pub role: Option<Role>,
    pub request_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            message: message.into(),
            role: None,
            request_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn for_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn for_request(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

pub struct NotificationCenter {
    items: Mutex<VecDeque<Notification>>,
    sender: broadcast::Sender<Notification>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(MAX_NOTIFICATIONS);
        Self {
            items: Mutex::new(VecDeque::with_capacity(MAX_NOTIFICATIONS)),
            sender,
        }
    }

    pub fn add(&self, notification: Notification) -> Uuid {
        match notification.kind {
            NotificationKind::Error => tracing::error!(
                title = %notification.title,
                request_id = ?notification.request_id,
                "{}", notification.message
            ),
            NotificationKind::Warning => tracing::warn!(
                title = %notification.title,
                request_id = ?notification.request_id,
                "{}", notification.message
            ),
            NotificationKind::Success | NotificationKind::Info => tracing::info!(
                title = %notification.title,
                request_id = ?notification.request_id,
                "{}", notification.message
            ),
        }

        let id = notification.id;
        {
            let mut items = self.lock();
            items.push_front(notification.clone());
            items.truncate(MAX_NOTIFICATIONS);
        }

        // No subscribers is fine.
        let _ = self.sender.send(notification);
        id
    }

    pub fn success(&self, title: &str, message: &str) -> Uuid {
        self.add(Notification::new(NotificationKind::Success, title, message))
    }

    pub fn error(&self, title: &str, message: &str) -> Uuid {
        self.add(Notification::new(NotificationKind::Error, title, message))
    }

    /// Newest first.
    pub fn list(&self) -> Vec<Notification> {
        self.lock().iter().cloned().collect()
    }

    pub fn list_for_role(&self, role: Role) -> Vec<Notification> {
        self.lock()
            .iter()
            .filter(|n| n.role.map_or(true, |r| r == role))
            .cloned()
            .collect()
    }

    /// Reading a notification dismisses it. Returns whether it existed.
    pub fn mark_read(&self, id: Uuid) -> bool {
        let mut items = self.lock();
        let before = items.len();
        items.retain(|n| n.id != id);
        items.len() != before
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Notification>> {
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first_and_capped() {
        let center = NotificationCenter::new();
        for i in 0..60 {
            center.success("Saved", &format!("n{}", i));
        }

        let items = center.list();
        assert_eq!(items.len(), MAX_NOTIFICATIONS);
        assert_eq!(items[0].message, "n59");
        assert_eq!(items[MAX_NOTIFICATIONS - 1].message, "n10");
    }

    #[test]
    fn test_mark_read_removes() {
        let center = NotificationCenter::new();
        let keep = center.success("a", "a");
        let read = center.error("b", "b");

        assert!(center.mark_read(read));
        assert!(!center.mark_read(read));
        assert_eq!(center.list().len(), 1);
        assert_eq!(center.list()[0].id, keep);

        center.clear();
        assert!(center.is_empty());
    }

    #[test]
    fn test_role_filter_includes_broadcasts() {
        let center = NotificationCenter::new();
        center.add(Notification::new(NotificationKind::Info, "all", "everyone"));
        center.add(
            Notification::new(NotificationKind::Info, "reg", "registrar only").for_role(Role::Registrar),
        );
        center.add(
            Notification::new(NotificationKind::Info, "dist", "distributor only")
                .for_role(Role::Distributor),
        );

        let registrar = center.list_for_role(Role::Registrar);
        assert_eq!(registrar.len(), 2);
        assert!(registrar.iter().all(|n| n.title != "dist"));
    }

    #[tokio::test]
    async fn test_subscribers_receive_new_notifications() {
        let center = NotificationCenter::new();
        let mut receiver = center.subscribe();

        center.add(Notification::new(NotificationKind::Warning, "Limit", "Soft limit exceeded").for_request("r-1"));

        let received = receiver.recv().await.unwrap();
        assert_eq!(received.kind, NotificationKind::Warning);
        assert_eq!(received.request_id.as_deref(), Some("r-1"));
    }
}
