//! In-process change notifications published after every successful mutation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeTable {
    Service,
    Tool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: ChangeTable,
    pub kind: ChangeKind,
    pub id: RecordId,
}

#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish to current subscribers; having none is not an error.
    pub fn publish(&self, table: ChangeTable, kind: ChangeKind, id: &str) {
        let event = ChangeEvent { table, kind, id: id.to_string() };
        if self.tx.send(event).is_err() {
            debug!(?table, ?kind, "change published without subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self { Self::new(64) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_events() {
        let feed = ChangeFeed::default();
        let mut rx = feed.subscribe();
        feed.publish(ChangeTable::Tool, ChangeKind::Update, "7");
        let evt = rx.recv().await.unwrap();
        assert_eq!(evt, ChangeEvent { table: ChangeTable::Tool, kind: ChangeKind::Update, id: "7".into() });
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        ChangeFeed::default().publish(ChangeTable::Service, ChangeKind::Delete, "x");
    }
}
