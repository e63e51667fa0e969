//! In-memory monitor store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::{
    CheckStatus, HealthRecord, Id, Monitor, MonitorId, MonitorStore, NewMonitor, RecordId,
    StoreError,
};

/// A store that keeps everything in memory.
///
/// Monitors get sequential numeric ids. The store also stands in for the
/// external prober: [`record`](Self::record) appends a check result, and
/// [`set_offline`](Self::set_offline) makes every call fail as if the store
/// could not be reached.
///
/// # Example
///
/// ```
/// use sitewatch_store::{CheckStatus, MemoryStore, MonitorStore, NewMonitor};
///
/// # tokio_test::block_on(async {
/// let store = MemoryStore::new();
/// let monitor = store
///     .create_monitor(&NewMonitor::new("https://example.com", 60))
///     .await
///     .unwrap();
/// store.record_now(&monitor.id, CheckStatus::Up, 120);
///
/// let history = store.fetch_history(&monitor.id, 50).await.unwrap();
/// assert_eq!(history.len(), 1);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    monitors: Vec<Monitor>,
    records: Vec<HealthRecord>,
    next_monitor_id: u64,
    next_record_id: u64,
    offline: bool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds the given monitors, in order.
    pub fn with_monitors(monitors: Vec<Monitor>) -> Self {
        let next_monitor_id = monitors
            .iter()
            .filter_map(|m| m.id.0.as_u64())
            .max()
            .unwrap_or(0);
        Self {
            state: RwLock::new(MemoryState {
                monitors,
                next_monitor_id,
                ..Default::default()
            }),
        }
    }

    /// Append a check result for a monitor and return it.
    ///
    /// The monitor does not have to exist: records only reference their
    /// monitor weakly.
    pub fn record(
        &self,
        monitor_id: &MonitorId,
        status: CheckStatus,
        response_time_ms: u64,
        checked_at: DateTime<Utc>,
    ) -> HealthRecord {
        let mut state = self.state.write();
        state.next_record_id += 1;
        let record = HealthRecord::new(
            RecordId(Id::Num(state.next_record_id)),
            monitor_id.clone(),
            status,
            response_time_ms,
            checked_at,
        );
        state.records.push(record.clone());
        record
    }

    /// Append a check result stamped with the current time.
    pub fn record_now(
        &self,
        monitor_id: &MonitorId,
        status: CheckStatus,
        response_time_ms: u64,
    ) -> HealthRecord {
        self.record(monitor_id, status, response_time_ms, Utc::now())
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.state.write().offline = offline;
    }

    /// Number of records held, across all monitors.
    pub fn record_count(&self) -> usize {
        self.state.read().records.len()
    }

    fn check_online(state: &MemoryState) -> Result<(), StoreError> {
        if state.offline {
            Err(StoreError::Unavailable("memory store is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MonitorStore for MemoryStore {
    async fn list_monitors(&self) -> Result<Vec<Monitor>, StoreError> {
        let state = self.state.read();
        Self::check_online(&state)?;
        Ok(state.monitors.clone())
    }

    async fn create_monitor(&self, monitor: &NewMonitor) -> Result<Monitor, StoreError> {
        let mut state = self.state.write();
        Self::check_online(&state)?;

        if state.monitors.iter().any(|m| m.url == monitor.url) {
            return Err(StoreError::Conflict(format!(
                "{} is already monitored",
                monitor.url
            )));
        }

        state.next_monitor_id += 1;
        let created = Monitor::new(state.next_monitor_id, monitor.url.clone(), monitor.interval);
        state.monitors.insert(0, created.clone());
        debug!("Created monitor {} for {}", created.id, created.url);
        Ok(created)
    }

    async fn delete_monitor(&self, id: &MonitorId) -> Result<(), StoreError> {
        let mut state = self.state.write();
        Self::check_online(&state)?;

        let before = state.monitors.len();
        state.monitors.retain(|m| &m.id != id);
        if state.monitors.len() == before {
            return Err(StoreError::NotFound(format!("monitor {}", id)));
        }
        Ok(())
    }

    async fn fetch_history(
        &self,
        id: &MonitorId,
        limit: usize,
    ) -> Result<Vec<HealthRecord>, StoreError> {
        let state = self.state.read();
        Self::check_online(&state)?;

        if !state.monitors.iter().any(|m| &m.id == id) {
            return Err(StoreError::NotFound(format!("monitor {}", id)));
        }

        let mut records: Vec<HealthRecord> = state
            .records
            .iter()
            .filter(|r| &r.monitor_id == id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.cmp_recency(a));
        records.truncate(limit);
        Ok(records)
    }

    fn description(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_714_560_000 + secs, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids_newest_first() {
        let store = MemoryStore::new();
        let a = store
            .create_monitor(&NewMonitor::new("https://a.example", 60))
            .await
            .unwrap();
        let b = store
            .create_monitor(&NewMonitor::new("https://b.example", 60))
            .await
            .unwrap();

        assert_eq!(a.id, MonitorId::from(1));
        assert_eq!(b.id, MonitorId::from(2));

        let listed = store.list_monitors().await.unwrap();
        assert_eq!(listed, vec![b, a]);
    }

    #[tokio::test]
    async fn test_create_duplicate_url_conflicts() {
        let store = MemoryStore::new();
        let body = NewMonitor::new("https://a.example", 60);
        store.create_monitor(&body).await.unwrap();

        let err = store.create_monitor(&body).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_with_monitors_continues_numbering() {
        let store = MemoryStore::with_monitors(vec![Monitor::new(7, "https://a.example", 60)]);
        let created = store
            .create_monitor(&NewMonitor::new("https://b.example", 60))
            .await
            .unwrap();
        assert_eq!(created.id, MonitorId::from(8));
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let store = MemoryStore::new();
        let err = store.delete_monitor(&MonitorId::from(9)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_records_survive_monitor_deletion() {
        let store = MemoryStore::with_monitors(vec![Monitor::new(1, "https://a.example", 60)]);
        let id = MonitorId::from(1);
        store.record(&id, CheckStatus::Up, 10, at(0));

        store.delete_monitor(&id).await.unwrap();
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_bounded() {
        let store = MemoryStore::with_monitors(vec![
            Monitor::new(1, "https://a.example", 60),
            Monitor::new(2, "https://b.example", 60),
        ]);
        let a = MonitorId::from(1);
        let b = MonitorId::from(2);

        store.record(&a, CheckStatus::Up, 10, at(0));
        store.record(&b, CheckStatus::Down, 0, at(5));
        store.record(&a, CheckStatus::Down, 0, at(120));
        store.record(&a, CheckStatus::Up, 30, at(60));

        let history = store.fetch_history(&a, 2).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|r| r.monitor_id == a));
        assert_eq!(history[0].checked_at, at(120));
        assert_eq!(history[1].checked_at, at(60));
    }

    #[tokio::test]
    async fn test_offline_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_offline(true);

        assert!(matches!(
            store.list_monitors().await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store
            .create_monitor(&NewMonitor::new("https://a.example", 60))
            .await
            .is_err());

        store.set_offline(false);
        assert!(store.list_monitors().await.is_ok());
    }
}
