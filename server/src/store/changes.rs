//! Change notifications for the remote tables.
//!
//! Every successful mutation through the [`Store`](super::Store) publishes an
//! event here. Long-lived views (the admin dashboard snapshot) subscribe and
//! re-fetch the affected table. Subscriptions are process-lifetime for the
//! subscriber: dropping the receiver ends them, and events missed while
//! unsubscribed or lagging are not replayed.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone)]
pub struct Change {
    pub table: String,
    pub kind: ChangeKind,
}

pub struct ChangeHub {
    tx: broadcast::Sender<Change>,
}

impl ChangeHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);

        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.tx.subscribe()
    }

    pub fn publish(&self, table: &str, kind: ChangeKind) {
        // A send error only means nobody is listening right now.
        let _ = self.tx.send(Change {
            table: table.to_string(),
            kind,
        });
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_change() {
        let hub = ChangeHub::new();
        let mut rx = hub.subscribe();

        hub.publish("surveys", ChangeKind::Insert);

        let change = rx.recv().await.unwrap();
        assert_eq!(change.table, "surveys");
        assert_eq!(change.kind, ChangeKind::Insert);
    }

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let hub = ChangeHub::new();
        hub.publish("workers", ChangeKind::Delete);
    }
}
