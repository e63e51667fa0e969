//! Derivations over health records.
//!
//! Everything in here is a pure function of the records it is given; the
//! session decides which records those are.
//!
//! ## Submodules
//!
//! - [`status`]: Current status from the most recent record
//! - [`uptime`]: Uptime percentage and response time summary over a window
//! - [`history`]: The bounded, newest-first window of one monitor
//! - [`interval`]: Parsing and formatting of check intervals ("5m", "every 5 min")
//!
//! ## Data Flow
//!
//! ```text
//! Vec<HealthRecord> (from the store)
//!        │
//!        ▼
//! HistoryWindow::from_records()   filter by monitor, sort, truncate
//!        │
//!        ├──▶ status::current_status()
//!        │
//!        └──▶ uptime::uptime_percentage()
//! ```

pub mod history;
pub mod interval;
pub mod status;
pub mod uptime;

pub use history::{HistoryWindow, DEFAULT_WINDOW};
pub use interval::{format_interval, parse_interval};
pub use status::{
    current_status, derive_status, latest_record, latest_record_for, status_for, Status,
};
pub use uptime::{response_times, uptime_percentage, ResponseTimes, Uptime};
