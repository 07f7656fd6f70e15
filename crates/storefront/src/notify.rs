//! Transient notifications ("toasts") and the dismissible error banner.

use std::time::Duration;

use bazaar_core::NotificationKind;
use tokio::time::Instant;

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(3_200);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub expires_at: Instant,
}

/// Notification queue with time-based expiry.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    next_id: u64,
    items: Vec<Notification>,
}

impl Notifications {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notification expiring [`NOTIFICATION_TTL`] from now.
    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        self.push_at(kind, message, Instant::now())
    }

    /// Queue a notification created at `now`.
    pub fn push_at(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        now: Instant,
    ) -> u64 {
        self.next_id += 1;
        let notification = Notification {
            id: self.next_id,
            kind,
            message: message.into(),
            expires_at: now + NOTIFICATION_TTL,
        };
        tracing::debug!(id = notification.id, kind = %kind, message = %notification.message, "Notify");
        self.items.push(notification);
        self.next_id
    }

    /// Drop expired notifications and return the live ones.
    pub fn active(&mut self, now: Instant) -> &[Notification] {
        self.items.retain(|item| item.expires_at > now);
        &self.items
    }

    /// Remove one notification early.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Remove and return every queued notification, expired or not.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.items)
    }

    /// Every queued notification, including ones that may have expired.
    #[must_use]
    pub fn all(&self) -> &[Notification] {
        &self.items
    }

    /// Most recently queued notification.
    #[must_use]
    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }
}

/// Sticky error text shown until dismissed or replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Banner(Option<String>);

impl Banner {
    pub fn set(&mut self, message: impl Into<String>) {
        self.0 = Some(message.into());
    }

    pub fn dismiss(&mut self) {
        self.0 = None;
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_expire() {
        let start = Instant::now();
        let mut notifications = Notifications::new();
        notifications.push_at(NotificationKind::Success, "Login successful.", start);
        notifications.push_at(
            NotificationKind::Info,
            "Item removed from cart.",
            start + Duration::from_secs(2),
        );

        assert_eq!(notifications.active(start + Duration::from_secs(3)).len(), 2);

        let live = notifications.active(start + Duration::from_millis(3_300));
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].message, "Item removed from cart.");

        assert!(notifications.active(start + Duration::from_secs(6)).is_empty());
    }

    #[test]
    fn test_ids_are_distinct_and_dismissible() {
        let mut notifications = Notifications::new();
        let first = notifications.push(NotificationKind::Info, "a");
        let second = notifications.push(NotificationKind::Warning, "b");
        assert_ne!(first, second);

        assert!(notifications.dismiss(first));
        assert!(!notifications.dismiss(first));
        assert_eq!(notifications.latest().unwrap().id, second);
        assert_eq!(notifications.drain().len(), 1);
        assert!(notifications.all().is_empty());
    }

    #[test]
    fn test_banner() {
        let mut banner = Banner::default();
        assert_eq!(banner.message(), None);
        banner.set("Request failed: 500");
        assert_eq!(banner.message(), Some("Request failed: 500"));
        banner.dismiss();
        assert_eq!(banner.message(), None);
    }
}
