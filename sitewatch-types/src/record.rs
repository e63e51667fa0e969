//! HealthRecord - one point-in-time check result.

use core::cmp::Ordering;
use core::fmt;

use chrono::{DateTime, Utc};

use crate::{MonitorId, RecordId};

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum CheckStatus {
    Up,
    Down,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Up => "UP",
            CheckStatus::Down => "DOWN",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A check result appended by the external prober.
///
/// Records are immutable and only reference their monitor weakly: a record
/// can outlive the monitor it was taken for.
///
/// The wire names follow the monitor API (`monitor_id`, `response_time`,
/// `checked_at`); camelCase spellings are accepted on input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthRecord {
    pub id: RecordId,

    #[cfg_attr(feature = "serde", serde(alias = "monitorId"))]
    pub monitor_id: MonitorId,

    pub status: CheckStatus,

    /// Round-trip time in milliseconds. Carried for DOWN checks too, where it
    /// is the time until the check failed.
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "response_time",
            alias = "response_time_ms",
            alias = "responseTimeMs",
            default
        )
    )]
    pub response_time_ms: u64,

    #[cfg_attr(feature = "serde", serde(alias = "checkedAt"))]
    pub checked_at: DateTime<Utc>,
}

impl HealthRecord {
    /// Create a record.
    pub fn new(
        id: impl Into<RecordId>,
        monitor_id: MonitorId,
        status: CheckStatus,
        response_time_ms: u64,
        checked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            monitor_id,
            status,
            response_time_ms,
            checked_at,
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == CheckStatus::Up
    }

    /// Order two records by recency: later `checked_at` is newer, ties are
    /// broken by the larger id.
    pub fn cmp_recency(&self, other: &Self) -> Ordering {
        self.checked_at
            .cmp(&other.checked_at)
            .then_with(|| self.id.cmp(&other.id))
    }
}
