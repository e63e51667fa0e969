//! Background history fetches.
//!
//! Each fetch runs as its own tokio task and reports back over a channel,
//! tagged with the ticket it was issued for. The feed does not judge
//! freshness; the session's staleness guard does that when results are
//! drained.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use sitewatch_store::MonitorStore;
use sitewatch_types::HealthRecord;

use crate::error::SessionError;
use crate::history_view::FetchTicket;

/// The outcome of one background fetch.
#[derive(Debug)]
pub struct FetchResult {
    pub ticket: FetchTicket,
    pub result: Result<Vec<HealthRecord>, SessionError>,
}

/// Spawns history fetches and collects their results.
#[derive(Debug)]
pub struct HistoryFeed {
    sender: mpsc::UnboundedSender<FetchResult>,
    receiver: mpsc::UnboundedReceiver<FetchResult>,
}

impl Default for HistoryFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryFeed {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    /// Start fetching the history for `ticket` in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self, store: Arc<dyn MonitorStore>, ticket: FetchTicket, limit: usize) {
        let tx = self.sender.clone();
        tokio::spawn(async move {
            debug!(
                "Fetching history for monitor {} (seq {})",
                ticket.monitor_id, ticket.seq
            );
            let result = store
                .fetch_history(&ticket.monitor_id, limit)
                .await
                .map_err(SessionError::fetch);
            // Receiver gone means the session was dropped
            let _ = tx.send(FetchResult { ticket, result });
        });
    }

    /// Take a finished result without waiting.
    pub fn poll(&mut self) -> Option<FetchResult> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the next finished result.
    pub async fn recv(&mut self) -> Option<FetchResult> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitewatch_store::{CheckStatus, MemoryStore, StoreError};
    use sitewatch_types::{Monitor, MonitorId};

    #[tokio::test]
    async fn test_reports_result_with_its_ticket() {
        let store = Arc::new(MemoryStore::with_monitors(vec![Monitor::new(
            1,
            "https://a.example",
            60,
        )]));
        let id = MonitorId::from(1);
        store.record_now(&id, CheckStatus::Up, 42);

        let mut feed = HistoryFeed::new();
        let ticket = FetchTicket {
            monitor_id: id.clone(),
            seq: 7,
        };
        feed.spawn(store, ticket.clone(), 50);

        let result = feed.recv().await.unwrap();
        assert_eq!(result.ticket, ticket);
        assert_eq!(result.result.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_fetch_error() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true);

        let mut feed = HistoryFeed::new();
        feed.spawn(
            store,
            FetchTicket {
                monitor_id: MonitorId::from(1),
                seq: 1,
            },
            50,
        );

        let result = feed.recv().await.unwrap();
        assert!(matches!(
            result.result,
            Err(SessionError::Fetch(StoreError::Unavailable(_)))
        ));
    }

    #[test]
    fn test_poll_empty() {
        let mut feed = HistoryFeed::new();
        assert!(feed.poll().is_none());
    }
}
