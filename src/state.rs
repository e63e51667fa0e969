//! Session state and its transitions.
//!
//! [`SessionState`] owns the registry, the history view and the last notice.
//! It performs no I/O: the [`App`](crate::App) talks to the store and feeds
//! the outcomes in here. Every method is a single transition, so the
//! invariants between registry and selection hold after each call.

use std::time::{Duration, Instant};

use sitewatch_types::{HealthRecord, Monitor, MonitorId};

use crate::data::{self, HistoryWindow, ResponseTimes, Status, Uptime};
use crate::error::SessionError;
use crate::history_view::{FetchTicket, HistoryUpdate, HistoryView};
use crate::registry::MonitorRegistry;

/// How long a success notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A short message about the outcome of the last operation.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub created: Instant,
}

impl Notice {
    /// Success notices expire after [`NOTICE_TTL`]; errors stay until
    /// replaced.
    pub fn is_expired(&self) -> bool {
        self.kind == NoticeKind::Success && self.created.elapsed() >= NOTICE_TTL
    }
}

/// Everything a session knows.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    registry: MonitorRegistry,
    view: HistoryView,
    /// Latest known checks across monitors, for list rendering.
    recent: Vec<HealthRecord>,
    notice: Option<Notice>,
}

impl SessionState {
    /// Create an empty session keeping `history_limit` records per window.
    pub fn new(history_limit: usize) -> Self {
        Self {
            view: HistoryView::new(history_limit),
            ..Default::default()
        }
    }

    pub fn monitors(&self) -> &[Monitor] {
        self.registry.monitors()
    }

    pub fn registry(&self) -> &MonitorRegistry {
        &self.registry
    }

    pub fn view(&self) -> &HistoryView {
        &self.view
    }

    pub fn selected(&self) -> Option<&MonitorId> {
        self.view.selected()
    }

    pub fn selected_monitor(&self) -> Option<&Monitor> {
        self.selected().and_then(|id| self.registry.get(id))
    }

    /// History of the selected monitor, newest first.
    pub fn history(&self) -> &HistoryWindow {
        self.view.window()
    }

    /// Current status of the selected monitor.
    pub fn status(&self) -> Status {
        self.history().status()
    }

    /// Uptime over the loaded window.
    pub fn uptime(&self) -> Uptime {
        self.history().uptime()
    }

    pub fn response_times(&self) -> Option<ResponseTimes> {
        self.history().response_times()
    }

    /// Most recent known record of any monitor, from the latest checks and
    /// the selected history.
    pub fn latest_record(&self, id: &MonitorId) -> Option<&HealthRecord> {
        let recent = data::latest_record_for(id, &self.recent);
        let history = data::latest_record_for(id, self.history().records());
        match (recent, history) {
            (Some(a), Some(b)) => Some(if a.cmp_recency(b).is_ge() { a } else { b }),
            (a, b) => a.or(b),
        }
    }

    /// Status of any monitor for list rendering. `Pending` until a check is
    /// known.
    pub fn monitor_status(&self, id: &MonitorId) -> Status {
        data::derive_status(self.latest_record(id))
    }

    /// Replace the monitor set with a fresh listing.
    ///
    /// A selection that is not part of the listing is dropped together with
    /// its history.
    pub fn replace_monitors(&mut self, listing: Vec<Monitor>) {
        self.registry.replace(listing);
        if let Some(selected) = self.view.selected() {
            if !self.registry.contains(selected) {
                self.view.deselect();
            }
        }
        let registry = &self.registry;
        self.recent.retain(|r| registry.contains(&r.monitor_id));
    }

    /// Record a monitor the store just created.
    pub fn monitor_added(&mut self, monitor: Monitor) -> Result<(), SessionError> {
        self.registry.prepend(monitor)
    }

    /// Forget a monitor the store just deleted. Clears the selection in the
    /// same step if it pointed at that monitor.
    pub fn monitor_removed(&mut self, id: &MonitorId) -> Option<Monitor> {
        let removed = self.registry.remove(id);
        if self.view.selected() == Some(id) {
            self.view.deselect();
        }
        self.recent.retain(|r| &r.monitor_id != id);
        removed
    }

    /// Change the selection. Returns the ticket to fetch history with when a
    /// monitor was selected.
    pub fn select(&mut self, id: Option<MonitorId>) -> Result<Option<FetchTicket>, SessionError> {
        match id {
            None => {
                self.view.deselect();
                Ok(None)
            }
            Some(id) if !self.registry.contains(&id) => {
                Err(SessionError::Validation(format!("unknown monitor {}", id)))
            }
            Some(id) => Ok(Some(self.view.select(id))),
        }
    }

    /// Offer a history fetch result to the staleness guard.
    pub fn apply_history(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<HealthRecord>, SessionError>,
    ) -> HistoryUpdate {
        self.view.apply(ticket, result)
    }

    /// Replace the latest known checks across monitors.
    pub fn set_recent_checks(&mut self, records: Vec<HealthRecord>) {
        let registry = &self.registry;
        self.recent = records
            .into_iter()
            .filter(|r| registry.contains(&r.monitor_id))
            .collect();
    }

    pub fn notify_success(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            kind: NoticeKind::Success,
            text: text.into(),
            created: Instant::now(),
        });
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            kind: NoticeKind::Error,
            text: text.into(),
            created: Instant::now(),
        });
    }

    /// The current notice, unless it has expired.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| !n.is_expired())
    }

    /// Forget everything, as on logout.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.view.deselect();
        self.recent.clear();
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sitewatch_types::CheckStatus;

    fn monitor(id: u64) -> Monitor {
        Monitor::new(id, format!("https://site{}.example", id), 300)
    }

    fn record(id: u64, monitor: u64, status: CheckStatus, secs: i64) -> HealthRecord {
        HealthRecord::new(
            id,
            MonitorId::from(monitor),
            status,
            100,
            Utc.timestamp_opt(1_714_560_000 + secs, 0).unwrap(),
        )
    }

    fn loaded() -> SessionState {
        let mut state = SessionState::new(50);
        state.replace_monitors(vec![monitor(1), monitor(2)]);
        let ticket = state.select(Some(MonitorId::from(1))).unwrap().unwrap();
        state.apply_history(
            &ticket,
            Ok(vec![
                record(2, 1, CheckStatus::Up, 60),
                record(1, 1, CheckStatus::Down, 0),
            ]),
        );
        state
    }

    #[test]
    fn test_removing_selected_clears_selection_and_history() {
        let mut state = loaded();
        assert_eq!(state.history().len(), 2);

        state.monitor_removed(&MonitorId::from(1));
        assert!(state.selected().is_none());
        assert!(state.history().is_empty());
        assert_eq!(state.monitors().len(), 1);
    }

    #[test]
    fn test_removing_other_monitor_keeps_selection() {
        let mut state = loaded();
        state.monitor_removed(&MonitorId::from(2));
        assert_eq!(state.selected(), Some(&MonitorId::from(1)));
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn test_listing_without_selected_clears_it() {
        let mut state = loaded();
        state.replace_monitors(vec![monitor(2)]);
        assert!(state.selected().is_none());
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_listing_with_selected_keeps_it() {
        let mut state = loaded();
        state.replace_monitors(vec![monitor(3), monitor(1)]);
        assert_eq!(state.selected(), Some(&MonitorId::from(1)));
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn test_select_unknown_monitor_fails_without_change() {
        let mut state = loaded();
        let err = state.select(Some(MonitorId::from(9))).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(state.selected(), Some(&MonitorId::from(1)));
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn test_text_keyed_store_matches_numeric_selection() {
        let monitors: Vec<Monitor> = serde_json::from_str(
            r#"[{"id": "12", "url": "https://example.com", "interval": 300}]"#,
        )
        .unwrap();
        let records: Vec<HealthRecord> = serde_json::from_str(
            r#"[
                {"id": "2", "monitor_id": "12", "status": "UP", "response_time": 90,
                 "checked_at": "2024-05-01T12:05:00Z"},
                {"id": "1", "monitor_id": 12, "status": "DOWN", "response_time": 0,
                 "checked_at": "2024-05-01T12:00:00Z"}
            ]"#,
        )
        .unwrap();

        let mut state = SessionState::new(50);
        state.replace_monitors(monitors);
        let id: MonitorId = "12".parse().unwrap();
        let ticket = state.select(Some(id.clone())).unwrap().unwrap();
        state.apply_history(&ticket, Ok(records));
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.uptime().to_string(), "50.00");

        state.monitor_removed(&MonitorId::from(12));
        assert!(state.selected().is_none());
        assert!(state.monitors().is_empty());
    }

    #[test]
    fn test_select_none_clears() {
        let mut state = loaded();
        assert_eq!(state.select(None).unwrap(), None);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_read_models() {
        let state = loaded();
        assert_eq!(state.status(), Status::Up);
        assert_eq!(state.uptime().to_string(), "50.00");
        assert_eq!(
            state.selected_monitor().map(|m| m.url.as_str()),
            Some("https://site1.example")
        );
        assert_eq!(state.monitor_status(&MonitorId::from(1)), Status::Up);
        assert_eq!(state.monitor_status(&MonitorId::from(2)), Status::Pending);
    }

    #[test]
    fn test_recent_checks_feed_list_status() {
        let mut state = loaded();
        state.set_recent_checks(vec![
            record(7, 2, CheckStatus::Down, 30),
            record(8, 5, CheckStatus::Up, 30),
        ]);
        assert_eq!(state.monitor_status(&MonitorId::from(2)), Status::Down);
        // A newer check from the latest-check sweep wins over history
        state.set_recent_checks(vec![record(9, 1, CheckStatus::Down, 600)]);
        assert_eq!(state.monitor_status(&MonitorId::from(1)), Status::Down);
        // History itself is untouched
        assert_eq!(state.status(), Status::Up);
    }

    #[test]
    fn test_notices() {
        let mut state = SessionState::new(50);
        assert!(state.notice().is_none());

        state.notify_success("monitor added");
        assert_eq!(state.notice().map(|n| n.kind), Some(NoticeKind::Success));

        state.notify_error("failed to fetch monitors");
        let notice = state.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "failed to fetch monitors");
    }

    #[test]
    fn test_success_notice_expires() {
        // The monotonic clock may start near zero on a fresh boot
        let Some(created) = Instant::now().checked_sub(Duration::from_secs(4)) else {
            return;
        };
        let notice = Notice {
            kind: NoticeKind::Success,
            text: "done".into(),
            created,
        };
        assert!(notice.is_expired());

        let error = Notice {
            kind: NoticeKind::Error,
            ..notice
        };
        assert!(!error.is_expired());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = loaded();
        state.notify_success("hello");
        state.reset();
        assert!(state.monitors().is_empty());
        assert!(state.selected().is_none());
        assert!(state.history().is_empty());
        assert!(state.notice().is_none());
    }
}
