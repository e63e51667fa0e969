//! Binds the selected monitor to its history window.
//!
//! History fetches run concurrently with everything else, so their results
//! can arrive late, out of order, or for a monitor that is no longer
//! selected. Every fetch is issued against a [`FetchTicket`]; a result is
//! committed only when its ticket still names the selected monitor and is
//! newer than the last result committed. Anything else is stale and dropped.

use tracing::debug;

use sitewatch_types::{HealthRecord, MonitorId};

use crate::data::{HistoryWindow, DEFAULT_WINDOW};
use crate::error::SessionError;

/// Identifies one history fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub monitor_id: MonitorId,
    pub seq: u64,
}

/// What happened to a fetch result handed to [`HistoryView::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryUpdate {
    /// The window was replaced with `records` records.
    Applied { monitor_id: MonitorId, records: usize },
    /// The result no longer matched the selection and was discarded.
    Stale { monitor_id: MonitorId },
    /// The fetch failed; the window kept its last good value.
    Failed {
        monitor_id: MonitorId,
        error: SessionError,
    },
}

impl HistoryUpdate {
    pub fn monitor_id(&self) -> &MonitorId {
        match self {
            HistoryUpdate::Applied { monitor_id, .. }
            | HistoryUpdate::Stale { monitor_id }
            | HistoryUpdate::Failed { monitor_id, .. } => monitor_id,
        }
    }
}

/// Selection and history state of a session.
#[derive(Debug, Clone)]
pub struct HistoryView {
    selected: Option<MonitorId>,
    window: HistoryWindow,
    limit: usize,
    /// Sequence number of the last ticket issued.
    issued_seq: u64,
    /// Sequence number of the last result accepted (applied or failed).
    resolved_seq: u64,
    last_error: Option<SessionError>,
}

impl Default for HistoryView {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl HistoryView {
    /// Create a view keeping at most `limit` records.
    pub fn new(limit: usize) -> Self {
        Self {
            selected: None,
            window: HistoryWindow::new(),
            limit,
            issued_seq: 0,
            resolved_seq: 0,
            last_error: None,
        }
    }

    pub fn selected(&self) -> Option<&MonitorId> {
        self.selected.as_ref()
    }

    pub fn window(&self) -> &HistoryWindow {
        &self.window
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Select a monitor and issue the ticket for fetching its history.
    ///
    /// Switching to another monitor empties the window right away.
    /// Re-selecting the current monitor keeps the window until the new
    /// result arrives.
    pub fn select(&mut self, monitor_id: MonitorId) -> FetchTicket {
        if self.selected.as_ref() != Some(&monitor_id) {
            self.window.clear();
            self.last_error = None;
            self.selected = Some(monitor_id.clone());
        }
        self.issued_seq += 1;
        FetchTicket {
            monitor_id,
            seq: self.issued_seq,
        }
    }

    /// Drop the selection and its history together.
    pub fn deselect(&mut self) {
        self.selected = None;
        self.window.clear();
        self.last_error = None;
    }

    /// Offer the result of a fetch.
    pub fn apply(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<HealthRecord>, SessionError>,
    ) -> HistoryUpdate {
        let monitor_id = ticket.monitor_id.clone();
        if self.selected.as_ref() != Some(&ticket.monitor_id) || ticket.seq <= self.resolved_seq {
            debug!(
                "Discarding stale history for monitor {} (seq {}, resolved {})",
                ticket.monitor_id, ticket.seq, self.resolved_seq
            );
            return HistoryUpdate::Stale { monitor_id };
        }
        self.resolved_seq = ticket.seq;

        match result {
            Ok(records) => {
                self.window = HistoryWindow::from_records(&monitor_id, records, self.limit);
                self.last_error = None;
                HistoryUpdate::Applied {
                    monitor_id,
                    records: self.window.len(),
                }
            }
            Err(error) => {
                self.last_error = Some(error.clone());
                HistoryUpdate::Failed { monitor_id, error }
            }
        }
    }

    /// True while the newest fetch for the selection has not come back.
    pub fn is_loading(&self) -> bool {
        self.selected.is_some() && self.resolved_seq < self.issued_seq
    }

    /// The error of the last fetch, if it failed.
    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sitewatch_store::StoreError;
    use sitewatch_types::CheckStatus;

    fn record(id: u64, monitor: u64, status: CheckStatus, secs: i64) -> HealthRecord {
        HealthRecord::new(
            id,
            MonitorId::from(monitor),
            status,
            100,
            Utc.timestamp_opt(1_714_560_000 + secs, 0).unwrap(),
        )
    }

    #[test]
    fn test_applies_current_selection() {
        let mut view = HistoryView::new(50);
        let ticket = view.select(MonitorId::from(1));
        assert!(view.is_loading());

        let update = view.apply(
            &ticket,
            Ok(vec![
                record(2, 1, CheckStatus::Up, 60),
                record(1, 1, CheckStatus::Down, 0),
            ]),
        );
        assert_eq!(
            update,
            HistoryUpdate::Applied {
                monitor_id: MonitorId::from(1),
                records: 2
            }
        );
        assert!(!view.is_loading());
        assert_eq!(view.window().len(), 2);
    }

    #[test]
    fn test_late_result_for_previous_selection_is_stale() {
        let mut view = HistoryView::new(50);
        let ticket_a = view.select(MonitorId::from(1));
        let ticket_b = view.select(MonitorId::from(2));

        view.apply(&ticket_b, Ok(vec![record(20, 2, CheckStatus::Up, 0)]));
        let update = view.apply(&ticket_a, Ok(vec![record(10, 1, CheckStatus::Down, 0)]));

        assert!(matches!(update, HistoryUpdate::Stale { .. }));
        assert_eq!(view.selected(), Some(&MonitorId::from(2)));
        assert!(view
            .window()
            .records()
            .iter()
            .all(|r| r.monitor_id == MonitorId::from(2)));
    }

    #[test]
    fn test_older_refresh_of_same_monitor_is_stale() {
        let mut view = HistoryView::new(50);
        let first = view.select(MonitorId::from(1));
        let second = view.select(MonitorId::from(1));

        view.apply(&second, Ok(vec![record(2, 1, CheckStatus::Up, 60)]));
        let update = view.apply(&first, Ok(vec![record(1, 1, CheckStatus::Down, 0)]));

        assert!(matches!(update, HistoryUpdate::Stale { .. }));
        assert_eq!(view.window().status(), crate::data::Status::Up);
    }

    #[test]
    fn test_switching_clears_window_reselecting_keeps_it() {
        let mut view = HistoryView::new(50);
        let ticket = view.select(MonitorId::from(1));
        view.apply(&ticket, Ok(vec![record(1, 1, CheckStatus::Up, 0)]));

        view.select(MonitorId::from(1));
        assert_eq!(view.window().len(), 1);

        view.select(MonitorId::from(2));
        assert!(view.window().is_empty());
    }

    #[test]
    fn test_failure_keeps_last_good_window() {
        let mut view = HistoryView::new(50);
        let ticket = view.select(MonitorId::from(1));
        view.apply(&ticket, Ok(vec![record(1, 1, CheckStatus::Up, 0)]));

        let retry = view.select(MonitorId::from(1));
        let update = view.apply(
            &retry,
            Err(SessionError::fetch(StoreError::Timeout)),
        );

        assert!(matches!(update, HistoryUpdate::Failed { .. }));
        assert_eq!(view.window().len(), 1);
        assert_eq!(view.selected(), Some(&MonitorId::from(1)));
        assert!(view.last_error().is_some());
    }

    #[test]
    fn test_result_after_deselect_is_stale() {
        let mut view = HistoryView::new(50);
        let ticket = view.select(MonitorId::from(1));
        view.deselect();

        let update = view.apply(&ticket, Ok(vec![record(1, 1, CheckStatus::Up, 0)]));
        assert!(matches!(update, HistoryUpdate::Stale { .. }));
        assert!(view.window().is_empty());
        assert!(!view.is_loading());
    }

    #[test]
    fn test_window_is_bounded_by_limit() {
        let mut view = HistoryView::new(2);
        let ticket = view.select(MonitorId::from(1));
        let records = (0..5)
            .map(|i| record(i, 1, CheckStatus::Up, i as i64))
            .collect();
        view.apply(&ticket, Ok(records));
        assert_eq!(view.window().len(), 2);
        assert_eq!(view.limit(), 2);
    }
}
