//! # sitewatch
//!
//! Website uptime tracking on top of a monitor store.
//!
//! An external prober appends pass/fail health checks for every registered
//! website to a store. This crate correlates monitors with those checks: it
//! keeps the session's list of monitors, binds one selected monitor to a
//! bounded, newest-first history, and derives current status and windowed
//! uptime from it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           Session                            │
//! │  ┌─────────┐   ┌────────────────────────────┐   ┌─────────┐  │
//! │  │   app   │──▶│           state            │──▶│ report  │  │
//! │  │ (async) │   │ registry + history_view    │   │ (text)  │  │
//! │  └────┬────┘   └─────────────┬──────────────┘   └─────────┘  │
//! │       │                      │                               │
//! │       ▼                      ▼                               │
//! │  ┌─────────┐           ┌──────────┐                          │
//! │  │ source  │           │   data   │ status, uptime, window   │
//! │  │ (store) │           └──────────┘                          │
//! │  └─────────┘                                                 │
//! │   HttpStore | FileStore | MemoryStore                        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: The session driver; awaits store calls and runs history
//!   fetches in the background
//! - **[`state`]**: Session state transitions ([`SessionState`])
//! - **[`registry`]**: The ordered monitor set and input validation
//! - **[`history_view`]**: Selection, history window and the staleness guard
//! - **[`data`]**: Status deriver, uptime aggregator and the history window
//! - **[`source`]**: Store implementations and the background history feed
//! - **[`config`]** / **[`report`]**: Settings and plain-text output for the CLI
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use sitewatch::{App, MemoryStore};
//! use sitewatch_types::CheckStatus;
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(MemoryStore::new());
//! let mut app = App::new(store.clone(), 50);
//!
//! let monitor = app.add_monitor("https://example.com", 300).await.unwrap();
//! store.record_now(&monitor.id, CheckStatus::Up, 120);
//!
//! app.select(Some(monitor.id.clone())).unwrap();
//! app.settle().await;
//!
//! assert_eq!(app.state().uptime().to_string(), "100.00");
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod history_view;
pub mod registry;
pub mod report;
pub mod source;
pub mod state;

pub use app::App;
pub use config::Settings;
pub use data::{HistoryWindow, ResponseTimes, Status, Uptime};
pub use error::SessionError;
pub use history_view::{FetchTicket, HistoryUpdate, HistoryView};
pub use registry::MonitorRegistry;
pub use source::{FileStore, HttpStore, MemoryStore, MonitorStore, StoreError};
pub use state::{Notice, NoticeKind, SessionState};
