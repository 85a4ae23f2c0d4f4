//! Notification sinks.

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::domain::Notification;
use crate::domain::ports::Notifier;

/// Writes every notification to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let Notification {
            title, description, ..
        } = &notification;
        if notification.is_failure() {
            warn!(%title, %description, "console action failed");
        } else {
            info!(%title, %description, "console action succeeded");
        }
    }
}

/// Forwards notifications to a WebSocket session.
///
/// Notifications are logged as well. Sends to a closed session are dropped.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Notifier plus the receiving end the session drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        TracingNotifier.notify(notification.clone());
        if self.sender.send(notification).is_err() {
            warn!("notification dropped: session closed");
        }
    }
}
