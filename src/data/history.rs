//! Bounded, newest-first history window for one monitor.

use tracing::warn;

use sitewatch_types::{HealthRecord, MonitorId};

use super::status::{self, Status};
use super::uptime::{self, ResponseTimes, Uptime};

/// Number of records kept when no limit is configured.
pub const DEFAULT_WINDOW: usize = 50;

/// The most recent records of a single monitor, newest first.
///
/// A window never holds records of more than one monitor and never more
/// records than the limit it was built with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryWindow {
    records: Vec<HealthRecord>,
}

impl HistoryWindow {
    /// Create an empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a window from whatever the store returned.
    ///
    /// Records of other monitors are dropped. The rest are sorted newest
    /// first by (`checked_at`, `id`) and truncated to `limit`.
    pub fn from_records(monitor_id: &MonitorId, records: Vec<HealthRecord>, limit: usize) -> Self {
        let total = records.len();
        let mut records: Vec<HealthRecord> = records
            .into_iter()
            .filter(|r| &r.monitor_id == monitor_id)
            .collect();

        let foreign = total - records.len();
        if foreign > 0 {
            warn!(
                "Dropped {} record(s) not belonging to monitor {}",
                foreign, monitor_id
            );
        }

        records.sort_by(|a, b| b.cmp_recency(a));
        records.truncate(limit);
        Self { records }
    }

    /// Records, newest first.
    pub fn records(&self) -> &[HealthRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<HealthRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record in the window.
    pub fn latest(&self) -> Option<&HealthRecord> {
        status::latest_record(&self.records)
    }

    /// Current status of the monitor this window belongs to.
    pub fn status(&self) -> Status {
        status::current_status(&self.records)
    }

    /// Uptime over the window.
    pub fn uptime(&self) -> Uptime {
        uptime::uptime_percentage(&self.records)
    }

    pub fn response_times(&self) -> Option<ResponseTimes> {
        uptime::response_times(&self.records)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// One character per check, oldest on the left: `█` up, `▁` down.
    pub fn strip(&self) -> String {
        self.records
            .iter()
            .rev()
            .map(|r| if r.is_up() { '█' } else { '▁' })
            .collect()
    }
}
