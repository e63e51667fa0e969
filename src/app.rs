//! The session driver: talks to the store and feeds outcomes into state.

use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use sitewatch_store::MonitorStore;
use sitewatch_types::{HealthRecord, Monitor, MonitorId};

use crate::data::{HistoryWindow, Status};
use crate::error::SessionError;
use crate::history_view::HistoryUpdate;
use crate::registry::validate_new_monitor;
use crate::source::{FetchResult, HistoryFeed};
use crate::state::SessionState;

/// One user session against a monitor store.
///
/// Listing, adding and removing monitors are awaited. History fetches run in
/// the background; their results are picked up with [`poll`](Self::poll) or
/// [`next_update`](Self::next_update) and pass through the staleness guard
/// before they touch state.
pub struct App {
    store: Arc<dyn MonitorStore>,
    state: SessionState,
    feed: HistoryFeed,
    /// Background fetches whose results have not been drained yet.
    in_flight: usize,
}

impl App {
    /// Create a session keeping `history_limit` records per history window.
    pub fn new(store: Arc<dyn MonitorStore>, history_limit: usize) -> Self {
        Self {
            store,
            state: SessionState::new(history_limit),
            feed: HistoryFeed::new(),
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns a description of the store this session talks to.
    pub fn source_description(&self) -> &str {
        self.store.description()
    }

    pub fn history_limit(&self) -> usize {
        self.state.view().limit()
    }

    /// Reload the monitor list from the store.
    ///
    /// On failure the previous list stays in place.
    pub async fn refresh_monitors(&mut self) -> Result<&[Monitor], SessionError> {
        match self.store.list_monitors().await {
            Ok(listing) => {
                debug!("Listed {} monitor(s)", listing.len());
                self.state.replace_monitors(listing);
                Ok(self.state.monitors())
            }
            Err(e) => {
                warn!("Failed to list monitors: {}", e);
                self.state.notify_error("failed to fetch monitors");
                Err(SessionError::fetch(e))
            }
        }
    }

    /// Register a new monitor and put it at the top of the list.
    pub async fn add_monitor(&mut self, url: &str, interval: u32) -> Result<Monitor, SessionError> {
        let body = match validate_new_monitor(url, interval) {
            Ok(body) => body,
            Err(e) => {
                self.state.notify_error(e.to_string());
                return Err(e);
            }
        };

        let created = match self.store.create_monitor(&body).await {
            Ok(created) => created,
            Err(e) => {
                warn!("Failed to add monitor {}: {}", body.url, e);
                let err = SessionError::mutation(e);
                self.state.notify_error(format!("failed to add monitor: {}", err));
                return Err(err);
            }
        };

        if let Err(e) = self.state.monitor_added(created.clone()) {
            warn!("Store returned existing id {} for {}", created.id, created.url);
            self.state.notify_error(e.to_string());
            return Err(e);
        }

        info!("Added monitor {} for {}", created.id, created.url);
        self.state.notify_success("monitor added");
        Ok(created)
    }

    /// Delete a monitor. It leaves the list only once the store confirmed.
    pub async fn remove_monitor(&mut self, id: &MonitorId) -> Result<(), SessionError> {
        if let Err(e) = self.store.delete_monitor(id).await {
            warn!("Failed to remove monitor {}: {}", id, e);
            let err = SessionError::mutation(e);
            self.state.notify_error(format!("failed to remove monitor: {}", err));
            return Err(err);
        }

        self.state.monitor_removed(id);
        info!("Removed monitor {}", id);
        self.state.notify_success("monitor removed");
        Ok(())
    }

    /// Change the selection and start fetching its history.
    ///
    /// Must be called from within a tokio runtime when selecting a monitor.
    pub fn select(&mut self, id: Option<MonitorId>) -> Result<(), SessionError> {
        let ticket = match self.state.select(id) {
            Ok(ticket) => ticket,
            Err(e) => {
                self.state.notify_error(e.to_string());
                return Err(e);
            }
        };

        if let Some(ticket) = ticket {
            self.feed
                .spawn(Arc::clone(&self.store), ticket, self.history_limit());
            self.in_flight += 1;
        }
        Ok(())
    }

    /// Fetch a bounded, newest-first history of any monitor without touching
    /// the selection.
    pub async fn fetch_history(
        &self,
        id: &MonitorId,
        limit: usize,
    ) -> Result<Vec<HealthRecord>, SessionError> {
        let records = self
            .store
            .fetch_history(id, limit)
            .await
            .map_err(SessionError::fetch)?;
        Ok(HistoryWindow::from_records(id, records, limit).into_records())
    }

    /// Apply every history result that has arrived, without waiting.
    pub fn poll(&mut self) -> Vec<HistoryUpdate> {
        let mut updates = Vec::new();
        while let Some(result) = self.feed.poll() {
            self.in_flight = self.in_flight.saturating_sub(1);
            updates.push(self.apply(result));
        }
        updates
    }

    /// Wait for the next history result and apply it.
    ///
    /// Returns `None` when no fetch is outstanding.
    pub async fn next_update(&mut self) -> Option<HistoryUpdate> {
        if self.in_flight == 0 {
            return None;
        }
        let result = self.feed.recv().await?;
        self.in_flight -= 1;
        Some(self.apply(result))
    }

    /// Wait until every outstanding fetch has come back.
    pub async fn settle(&mut self) -> Vec<HistoryUpdate> {
        let mut updates = Vec::new();
        while let Some(update) = self.next_update().await {
            updates.push(update);
        }
        updates
    }

    fn apply(&mut self, fetched: FetchResult) -> HistoryUpdate {
        let update = self.state.apply_history(&fetched.ticket, fetched.result);
        if let HistoryUpdate::Failed { monitor_id, error } = &update {
            warn!("Failed to fetch history for monitor {}: {}", monitor_id, error);
            self.state.notify_error("failed to fetch history");
        }
        update
    }

    /// Fetch the latest check of every known monitor, for list status.
    ///
    /// Monitors whose check cannot be fetched stay `Pending`.
    pub async fn refresh_latest_checks(&mut self) {
        let mut tasks = JoinSet::new();
        for monitor in self.state.monitors() {
            let store = Arc::clone(&self.store);
            let id = monitor.id.clone();
            tasks.spawn(async move {
                let result = store.fetch_history(&id, 1).await;
                (id, result)
            });
        }

        let mut latest = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(records))) => latest.extend(records),
                Ok((id, Err(e))) => debug!("No latest check for monitor {}: {}", id, e),
                Err(e) => warn!("Latest check task failed: {}", e),
            }
        }
        self.state.set_recent_checks(latest);
    }

    /// Forget monitors, selection, history and notices, as on logout.
    ///
    /// Fetches still in flight are discarded as stale when they land.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &Path) -> anyhow::Result<()> {
        use std::io::Write;

        let state = &self.state;
        let mut export = serde_json::Map::new();

        let monitors: Vec<serde_json::Value> = state
            .monitors()
            .iter()
            .map(|m| {
                serde_json::json!({
                    "id": m.id,
                    "url": m.url,
                    "host": m.host(),
                    "interval": m.interval,
                    "status": state.monitor_status(&m.id),
                })
            })
            .collect();
        export.insert("monitors".to_string(), serde_json::Value::Array(monitors));

        let mut summary = serde_json::Map::new();
        summary.insert("total".to_string(), serde_json::json!(state.monitors().len()));
        for status in [Status::Up, Status::Down, Status::Pending] {
            let count = state
                .monitors()
                .iter()
                .filter(|m| state.monitor_status(&m.id) == status)
                .count();
            summary.insert(status.label().to_lowercase(), serde_json::json!(count));
        }
        export.insert("summary".to_string(), serde_json::Value::Object(summary));

        if let Some(selected) = state.selected() {
            export.insert(
                "selected".to_string(),
                serde_json::json!({
                    "monitor_id": selected,
                    "status": state.status(),
                    "uptime": state.uptime(),
                    "response_times": state.response_times(),
                    "history": state.history().records(),
                }),
            );
        }

        let json = serde_json::to_string_pretty(&serde_json::Value::Object(export))?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}
