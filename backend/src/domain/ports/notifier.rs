//! Driven port for user-facing toast notifications.
//!
//! Notifications are fire-and-forget; implementations must not block and
//! never report delivery failures back to the caller.

use crate::domain::Notification;

/// Sink for console notifications.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Surface a notification to the user.
    fn notify(&self, notification: Notification);
}

/// Notifier that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify(&self, _notification: Notification) {}
}
