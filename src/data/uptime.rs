//! Uptime and response time over a window of records.
//!
//! Everything here is computed over the records it is handed, which is the
//! currently loaded window ("the last N checks"), never a monitor's lifetime.

use std::fmt;

use serde::{Serialize, Serializer};

use sitewatch_types::HealthRecord;

/// An uptime percentage, stored in hundredths of a percent.
///
/// Keeping the value as an integer makes the two-decimal rounding exact:
/// 2 of 3 checks up is exactly `66.67`, not a float that prints as
/// `66.66666`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Uptime(u32);

impl Uptime {
    pub const ZERO: Uptime = Uptime(0);
    pub const FULL: Uptime = Uptime(10_000);

    /// `100 * up / total`, rounded half-up to two decimals. Zero when
    /// `total` is zero.
    pub fn from_counts(up: usize, total: usize) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        let up = up.min(total) as u128;
        let total = total as u128;
        // floor(up * 10000 / total + 1/2)
        let hundredths = (up * 20_000 + total) / (2 * total);
        Uptime(hundredths as u32)
    }

    /// The value in hundredths of a percent (`6667` for 66.67%).
    pub fn hundredths(&self) -> u32 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Uptime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// Uptime over a window of records.
pub fn uptime_percentage(records: &[HealthRecord]) -> Uptime {
    let up = records.iter().filter(|r| r.is_up()).count();
    Uptime::from_counts(up, records.len())
}

/// Response time summary over the successful checks of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponseTimes {
    pub average_ms: u64,
    pub min_ms: u64,
    pub max_ms: u64,
    /// Number of UP checks the summary was computed from.
    pub samples: usize,
}

/// Summarize response times of UP records. `None` when there are none.
///
/// DOWN checks carry a response time too, but it measures nothing useful.
pub fn response_times(records: &[HealthRecord]) -> Option<ResponseTimes> {
    let times: Vec<u64> = records
        .iter()
        .filter(|r| r.is_up())
        .map(|r| r.response_time_ms)
        .collect();

    let min_ms = *times.iter().min()?;
    let max_ms = *times.iter().max()?;
    let samples = times.len();
    let sum: u128 = times.iter().map(|&t| u128::from(t)).sum();
    let average_ms = ((sum + samples as u128 / 2) / samples as u128) as u64;

    Some(ResponseTimes {
        average_ms,
        min_ms,
        max_ms,
        samples,
    })
}
