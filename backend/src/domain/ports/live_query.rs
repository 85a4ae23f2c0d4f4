//! Push-based collection subscriptions.
//!
//! A [`LiveQuery`] yields the current snapshot of a collection and wakes its
//! owner whenever the backing store publishes a new one. Dropping the query
//! unsubscribes. `None` snapshots mean the first result has not arrived yet.

use std::future;

use tokio::sync::watch;

/// Live view over one collection.
#[derive(Debug)]
pub struct LiveQuery<T> {
    receiver: watch::Receiver<Option<Vec<T>>>,
    closed: bool,
}

impl<T: Clone> LiveQuery<T> {
    /// Wrap a receiver handed out by a store adapter.
    pub fn new(receiver: watch::Receiver<Option<Vec<T>>>) -> Self {
        Self {
            receiver,
            closed: false,
        }
    }

    /// A query that never changes, already holding `items`.
    pub fn ready(items: Vec<T>) -> Self {
        let (_sender, receiver) = watch::channel(Some(items));
        Self::new(receiver)
    }

    /// A query that never resolves its first snapshot.
    pub fn loading() -> Self {
        let (_sender, receiver) = watch::channel(None);
        Self::new(receiver)
    }

    /// Whether the first snapshot is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.receiver.borrow().is_none()
    }

    /// Latest snapshot, empty while loading.
    pub fn snapshot(&self) -> Vec<T> {
        self.receiver.borrow().clone().unwrap_or_default()
    }

    /// Wait for the next published snapshot.
    ///
    /// Once the publisher goes away the query is frozen at its last snapshot
    /// and this future never completes.
    pub async fn changed(&mut self) {
        if !self.closed {
            match self.receiver.changed().await {
                Ok(()) => return,
                Err(_) => self.closed = true,
            }
        }
        future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn yields_published_snapshots() {
        let (sender, receiver) = watch::channel(Some(vec![1_u8]));
        let mut query = LiveQuery::new(receiver);
        assert_eq!(query.snapshot(), vec![1]);

        sender.send_replace(Some(vec![1, 2]));
        query.changed().await;
        assert_eq!(query.snapshot(), vec![1, 2]);
    }

    #[tokio::test]
    async fn loading_queries_report_empty_snapshots() {
        let query = LiveQuery::<u8>::loading();
        assert!(query.is_loading());
        assert!(query.snapshot().is_empty());
    }

    #[tokio::test]
    async fn closed_queries_stop_waking() {
        let mut query = LiveQuery::ready(vec![7_u8]);
        let woke = tokio::time::timeout(Duration::from_millis(20), query.changed()).await;
        assert!(woke.is_err(), "a closed query must not report changes");
        assert_eq!(query.snapshot(), vec![7]);
    }
}
