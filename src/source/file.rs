//! File-backed monitor store.
//!
//! Keeps monitors and health records in a single JSON document, for offline
//! use and for feeding recorded check results to the CLI.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use sitewatch_store::{MonitorStore, StoreError};
use sitewatch_types::{HealthRecord, Id, Monitor, MonitorId, NewMonitor};

/// On-disk layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    monitors: Vec<Monitor>,
    #[serde(default)]
    records: Vec<HealthRecord>,
}

/// A store that reads and writes a JSON file on every call.
///
/// ```json
/// {
///   "monitors": [{ "id": 1, "url": "https://example.com", "interval": 300 }],
///   "records": [{ "id": 1, "monitor_id": 1, "status": "UP",
///                 "response_time": 120, "checked_at": "2024-05-01T12:00:00Z" }]
/// }
/// ```
///
/// A missing file is an empty store; it is created on the first write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    description: String,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            lock: Mutex::new(()),
        }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<StoreFile, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| StoreError::Parse(format!("{}: {}", self.path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreFile::default()),
            Err(e) => Err(StoreError::Unavailable(format!(
                "read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn save(&self, file: &StoreFile) -> Result<(), StoreError> {
        let content =
            serde_json::to_string_pretty(file).map_err(|e| StoreError::Parse(e.to_string()))?;
        tokio::fs::write(&self.path, content).await.map_err(|e| {
            StoreError::Unavailable(format!("write {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl MonitorStore for FileStore {
    async fn list_monitors(&self) -> Result<Vec<Monitor>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.monitors)
    }

    async fn create_monitor(&self, monitor: &NewMonitor) -> Result<Monitor, StoreError> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;

        if file.monitors.iter().any(|m| m.url == monitor.url) {
            return Err(StoreError::Conflict(format!(
                "{} is already monitored",
                monitor.url
            )));
        }

        let next = file
            .monitors
            .iter()
            .filter_map(|m| m.id.0.as_u64())
            .max()
            .unwrap_or(0)
            + 1;
        let created = Monitor::new(MonitorId(Id::Num(next)), monitor.url.clone(), monitor.interval);
        file.monitors.insert(0, created.clone());
        self.save(&file).await?;

        debug!("Created monitor {} in {}", created.id, self.path.display());
        Ok(created)
    }

    async fn delete_monitor(&self, id: &MonitorId) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;

        let before = file.monitors.len();
        file.monitors.retain(|m| &m.id != id);
        if file.monitors.len() == before {
            return Err(StoreError::NotFound(format!("monitor {}", id)));
        }
        self.save(&file).await
    }

    async fn fetch_history(
        &self,
        id: &MonitorId,
        limit: usize,
    ) -> Result<Vec<HealthRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let file = self.load().await?;

        if !file.monitors.iter().any(|m| &m.id == id) {
            return Err(StoreError::NotFound(format!("monitor {}", id)));
        }

        let mut records: Vec<HealthRecord> = file
            .records
            .into_iter()
            .filter(|r| &r.monitor_id == id)
            .collect();
        records.sort_by(|a, b| b.cmp_recency(a));
        records.truncate(limit);
        Ok(records)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
