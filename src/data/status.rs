//! Current status derivation.
//!
//! A monitor's current status is the status of its most recent health
//! record, nothing more: no smoothing, averaging or hysteresis. "Most recent"
//! is an explicit maximum over (`checked_at`, `id`), so the result does not
//! depend on the order the store returned records in.

use std::fmt;

use serde::Serialize;

use sitewatch_types::{CheckStatus, HealthRecord, MonitorId};

/// Derived status of a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Up,
    Down,
    /// Not checked yet (no record available).
    Pending,
}

impl Status {
    /// Returns the display label for this status.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Up => "UP",
            Status::Down => "DOWN",
            Status::Pending => "PENDING",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<CheckStatus> for Status {
    fn from(status: CheckStatus) -> Self {
        match status {
            CheckStatus::Up => Status::Up,
            CheckStatus::Down => Status::Down,
        }
    }
}

/// Status of a single record, or `Pending` when there is none.
pub fn derive_status(record: Option<&HealthRecord>) -> Status {
    record.map_or(Status::Pending, |r| r.status.into())
}

/// The most recent record in `records`, regardless of their order.
pub fn latest_record(records: &[HealthRecord]) -> Option<&HealthRecord> {
    records.iter().max_by(|a, b| a.cmp_recency(b))
}

/// The most recent record belonging to `monitor_id`.
///
/// `records` may mix several monitors; records of other monitors are
/// ignored.
pub fn latest_record_for<'a>(
    monitor_id: &MonitorId,
    records: &'a [HealthRecord],
) -> Option<&'a HealthRecord> {
    records
        .iter()
        .filter(|r| &r.monitor_id == monitor_id)
        .max_by(|a, b| a.cmp_recency(b))
}

/// Status of the most recent record in `records`.
pub fn current_status(records: &[HealthRecord]) -> Status {
    derive_status(latest_record(records))
}

/// Quick status of one monitor from a set of records across monitors.
pub fn status_for(monitor_id: &MonitorId, records: &[HealthRecord]) -> Status {
    derive_status(latest_record_for(monitor_id, records))
}
