//! The ordered set of monitors known to a session.

use std::collections::HashSet;

use tracing::warn;
use url::Url;

use sitewatch_types::{Monitor, MonitorId, NewMonitor};

use crate::error::SessionError;

/// Monitors of the session, newest first after an add.
///
/// Never holds two monitors with the same id.
#[derive(Debug, Clone, Default)]
pub struct MonitorRegistry {
    monitors: Vec<Monitor>,
}

impl MonitorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    pub fn get(&self, id: &MonitorId) -> Option<&Monitor> {
        self.monitors.iter().find(|m| &m.id == id)
    }

    pub fn contains(&self, id: &MonitorId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Replace the whole set with a fresh listing.
    ///
    /// Duplicate ids keep their first occurrence. Returns how many entries
    /// were dropped as duplicates.
    pub fn replace(&mut self, listing: Vec<Monitor>) -> usize {
        let total = listing.len();
        let mut seen = HashSet::with_capacity(total);
        self.monitors = listing
            .into_iter()
            .filter(|m| seen.insert(m.id.clone()))
            .collect();

        let dropped = total - self.monitors.len();
        if dropped > 0 {
            warn!("Listing contained {} duplicate monitor id(s)", dropped);
        }
        dropped
    }

    /// Put a newly created monitor in front.
    ///
    /// Fails without touching the set if the id is already known.
    pub fn prepend(&mut self, monitor: Monitor) -> Result<(), SessionError> {
        if self.contains(&monitor.id) {
            return Err(SessionError::Conflict(format!(
                "monitor {} already exists",
                monitor.id
            )));
        }
        self.monitors.insert(0, monitor);
        Ok(())
    }

    /// Remove a monitor, keeping the order of the rest.
    pub fn remove(&mut self, id: &MonitorId) -> Option<Monitor> {
        let index = self.monitors.iter().position(|m| &m.id == id)?;
        Some(self.monitors.remove(index))
    }

    pub fn clear(&mut self) {
        self.monitors.clear();
    }
}

/// Check user input for a new monitor.
///
/// The url is trimmed and must be absolute with a host; the interval must be
/// positive.
pub fn validate_new_monitor(url: &str, interval: u32) -> Result<NewMonitor, SessionError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(SessionError::Validation("empty url".to_string()));
    }

    let parsed = Url::parse(url)
        .map_err(|e| SessionError::Validation(format!("invalid url {}: {}", url, e)))?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(SessionError::Validation(format!("url has no host: {}", url)));
    }

    if interval == 0 {
        return Err(SessionError::Validation(
            "interval must be a positive number of seconds".to_string(),
        ));
    }

    Ok(NewMonitor::new(url, interval))
}
