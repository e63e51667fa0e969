//! Plain-text rendering of session read models.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use sitewatch_types::{HealthRecord, Monitor};

use crate::data::format_interval;
use crate::state::SessionState;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

fn format_time(t: &DateTime<Utc>) -> String {
    t.format(TIME_FORMAT).to_string()
}

fn host_label(monitor: &Monitor) -> String {
    monitor.host().unwrap_or_else(|| monitor.url.clone())
}

/// Table of monitors, in session order.
pub fn monitor_list(state: &SessionState) -> String {
    if state.monitors().is_empty() {
        return "No monitors yet.\n".to_string();
    }

    let id_width = state
        .monitors()
        .iter()
        .map(|m| m.id.to_string().len())
        .max()
        .unwrap_or(0)
        .max(2);
    let host_width = state
        .monitors()
        .iter()
        .map(|m| host_label(m).len())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<iw$}  {:<7}  {:<hw$}  {:<14}  URL",
        "ID",
        "STATUS",
        "HOST",
        "INTERVAL",
        iw = id_width,
        hw = host_width
    );
    for monitor in state.monitors() {
        let _ = writeln!(
            out,
            "{:<iw$}  {:<7}  {:<hw$}  {:<14}  {}",
            monitor.id.to_string(),
            state.monitor_status(&monitor.id).label(),
            host_label(monitor),
            format_interval(monitor.interval),
            monitor.url,
            iw = id_width,
            hw = host_width
        );
    }
    out
}

fn record_line(out: &mut String, record: &HealthRecord) {
    let _ = writeln!(
        out,
        "  {}  {:<4}  {} ms",
        format_time(&record.checked_at),
        record.status.as_str(),
        record.response_time_ms
    );
}

/// Detail view of the selected monitor. Empty when nothing is selected.
pub fn monitor_detail(state: &SessionState) -> String {
    let Some(monitor) = state.selected_monitor() else {
        return String::new();
    };
    let history = state.history();

    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", host_label(monitor), monitor.url);
    let _ = writeln!(out, "Checked {}", format_interval(monitor.interval));
    let _ = writeln!(out, "Status:  {}", history.status());

    match history.latest() {
        Some(latest) => {
            let _ = writeln!(out, "Last check: {}", format_time(&latest.checked_at));
            let _ = writeln!(out, "Response:   {} ms", latest.response_time_ms);
        }
        None => {
            let _ = writeln!(out, "Last check: never");
        }
    }

    if let Some(error) = state.view().last_error() {
        let _ = writeln!(out, "Warning: {}", error);
    }

    if history.is_empty() {
        let _ = writeln!(out, "No checks recorded yet.");
        return out;
    }

    let _ = writeln!(
        out,
        "Uptime:  {}% (last {} checks)",
        history.uptime(),
        history.len()
    );
    if let Some(times) = history.response_times() {
        let _ = writeln!(
            out,
            "Response time: avg {} ms, min {} ms, max {} ms",
            times.average_ms, times.min_ms, times.max_ms
        );
    }
    let _ = writeln!(out, "{}", history.strip());
    let _ = writeln!(out);
    let _ = writeln!(out, "Recent checks:");
    for record in history.records() {
        record_line(&mut out, record);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sitewatch_types::{CheckStatus, MonitorId};

    fn state_with_history() -> SessionState {
        let mut state = SessionState::new(50);
        state.replace_monitors(vec![
            Monitor::new(1, "https://example.com/health", 300),
            Monitor::new(12, "https://status.example.org", 60),
        ]);
        let ticket = state.select(Some(MonitorId::from(1))).unwrap().unwrap();
        let at = |secs: i64| Utc.timestamp_opt(1_714_564_800 + secs, 0).unwrap();
        state.apply_history(
            &ticket,
            Ok(vec![
                HealthRecord::new(2, MonitorId::from(1), CheckStatus::Up, 120, at(300)),
                HealthRecord::new(1, MonitorId::from(1), CheckStatus::Down, 0, at(0)),
            ]),
        );
        state
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(monitor_list(&SessionState::new(50)), "No monitors yet.\n");
    }

    #[test]
    fn test_list_rows() {
        let list = monitor_list(&state_with_history());
        let lines: Vec<&str> = list.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("UP"));
        assert!(lines[1].contains("example.com"));
        assert!(lines[1].contains("every 5 min"));
        assert!(lines[2].contains("PENDING"));
        assert!(lines[2].contains("every 1 min"));
    }

    #[test]
    fn test_detail() {
        let detail = monitor_detail(&state_with_history());
        assert!(detail.contains("Status:  UP"));
        assert!(detail.contains("Last check: 2024-05-01 12:05:00 UTC"));
        assert!(detail.contains("Uptime:  50.00% (last 2 checks)"));
        assert!(detail.contains("avg 120 ms"));
        assert!(detail.contains("▁█"));
    }

    #[test]
    fn test_detail_shows_response_time_of_failed_checks() {
        let mut state = SessionState::new(50);
        state.replace_monitors(vec![Monitor::new(1, "https://example.com", 300)]);
        let ticket = state.select(Some(MonitorId::from(1))).unwrap().unwrap();
        let at = |secs: i64| Utc.timestamp_opt(1_714_564_800 + secs, 0).unwrap();
        state.apply_history(
            &ticket,
            Ok(vec![
                HealthRecord::new(2, MonitorId::from(1), CheckStatus::Down, 4000, at(300)),
                HealthRecord::new(1, MonitorId::from(1), CheckStatus::Down, 0, at(0)),
            ]),
        );

        let detail = monitor_detail(&state);
        assert!(detail.contains("Status:  DOWN"));
        assert!(detail.contains("Response:   4000 ms"));
        assert!(detail.contains("2024-05-01 12:05:00 UTC  DOWN  4000 ms"));
        assert!(detail.contains("2024-05-01 12:00:00 UTC  DOWN  0 ms"));
    }

    #[test]
    fn test_detail_without_selection() {
        let mut state = state_with_history();
        state.select(None).unwrap();
        assert_eq!(monitor_detail(&state), "");
    }

    #[test]
    fn test_detail_without_checks() {
        let mut state = SessionState::new(50);
        state.replace_monitors(vec![Monitor::new(1, "https://example.com", 300)]);
        state.select(Some(MonitorId::from(1))).unwrap();
        let detail = monitor_detail(&state);
        assert!(detail.contains("Status:  PENDING"));
        assert!(detail.contains("No checks recorded yet."));
    }
}
