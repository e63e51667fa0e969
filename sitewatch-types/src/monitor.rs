//! Monitor - a registered website and its check interval.

use url::Url;

use crate::MonitorId;

/// Check intervals offered when registering a monitor, in seconds.
///
/// Any positive interval is valid; these are the presets clients offer.
pub const INTERVAL_PRESETS: [u32; 4] = [60, 300, 600, 1800];

/// Interval used when none is given.
pub const DEFAULT_INTERVAL_SECS: u32 = 300;

/// A website tracked by the external prober.
///
/// Monitors are created and destroyed through the store; they are never
/// edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Monitor {
    /// Store-assigned identifier.
    pub id: MonitorId,

    /// Absolute URL of the checked endpoint.
    pub url: String,

    /// Seconds between checks.
    pub interval: u32,
}

impl Monitor {
    /// Create a monitor record.
    pub fn new(id: impl Into<MonitorId>, url: impl Into<String>, interval: u32) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            interval,
        }
    }

    /// Hostname of the monitored URL, if it parses.
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }
}

/// Request body for registering a new monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewMonitor {
    pub url: String,
    pub interval: u32,
}

impl NewMonitor {
    pub fn new(url: impl Into<String>, interval: u32) -> Self {
        Self {
            url: url.into(),
            interval,
        }
    }
}
