//! User-facing notifications.
//!
//! Services report outcomes ("Added to cart", "Rental failed") through a
//! [`Notifier`]. Notifying is fire-and-forget: it never fails and never blocks
//! the operation that triggered it.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Info,
    /// Something went wrong and the user should know.
    Destructive,
}

/// A titled message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    /// Informational notification.
    #[must_use]
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: NotificationKind::Info,
        }
    }

    /// Error notification.
    #[must_use]
    pub fn destructive(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: NotificationKind::Destructive,
        }
    }
}

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Deliver a notification.
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Writes notifications to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Info => {
                tracing::info!(title = %notification.title, "{}", notification.message);
            }
            NotificationKind::Destructive => {
                tracing::warn!(title = %notification.title, "{}", notification.message);
            }
        }
    }
}

/// Records notifications so they can be inspected or replayed later.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first.
    #[must_use]
    pub fn received(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return everything received so far.
    #[must_use]
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.received.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Drain everything received so far into `target`, oldest first.
    /// Returns how many notifications were forwarded.
    pub fn replay_into(&self, target: &impl Notifier) -> usize {
        let pending = self.drain();
        let count = pending.len();
        for notification in pending {
            target.notify(notification);
        }
        count
    }

    /// Titles of the notifications received so far.
    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        self.received().into_iter().map(|n| n.title).collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_notifier_records_in_order() {
        let notifier = MemoryNotifier::new();
        notifier.notify(Notification::info("First", "one"));
        notifier.notify(Notification::destructive("Second", "two"));

        let received = notifier.received();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].title, "First");
        assert_eq!(received[1].kind, NotificationKind::Destructive);
    }

    #[test]
    fn test_drain_empties_buffer() {
        let notifier = MemoryNotifier::new();
        notifier.notify(Notification::info("Hello", "world"));
        assert_eq!(notifier.drain().len(), 1);
        assert!(notifier.received().is_empty());
    }

    #[test]
    fn test_replay_forwards_in_order() {
        let queued = MemoryNotifier::new();
        queued.notify(Notification::info("Added to cart", "Dune"));
        queued.notify(Notification::destructive("Rental failed", "nope"));

        let target = MemoryNotifier::new();
        assert_eq!(queued.replay_into(&target), 2);
        assert_eq!(target.titles(), vec!["Added to cart", "Rental failed"]);
        assert!(queued.received().is_empty());
    }

    #[test]
    fn test_replay_into_tracing_log() {
        let queued = MemoryNotifier::new();
        queued.notify(Notification::info("Cart cleared", ""));
        queued.notify(Notification::destructive("Rental failed", "Invalid rental plan"));

        assert_eq!(queued.replay_into(&TracingNotifier), 2);
        assert_eq!(queued.replay_into(&TracingNotifier), 0);
    }

    #[test]
    fn test_clones_share_buffer() {
        let notifier = MemoryNotifier::new();
        let handle = notifier.clone();
        handle.notify(Notification::info("Shared", ""));
        assert_eq!(notifier.titles(), vec!["Shared"]);
    }
}
