//! # sitewatch-types
//!
//! Core types for website uptime monitoring. This crate defines the data
//! model shared between the sitewatch engine and the monitor store: the
//! registered [`Monitor`]s and the [`HealthRecord`]s an external prober
//! appends for each of them.
//!
//! ## Design Goals
//!
//! - **Store compatible**: field names match the JSON the monitor API speaks
//! - **Opaque ids**: ids round-trip exactly as the store produced them
//! - **Optional serialization**: enable the `serde` feature (on by default)
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use sitewatch_types::{CheckStatus, HealthRecord, Monitor};
//!
//! let monitor = Monitor::new(7, "https://example.com/health", 300);
//! assert_eq!(monitor.host().as_deref(), Some("example.com"));
//!
//! let record = HealthRecord::new(
//!     1,
//!     monitor.id.clone(),
//!     CheckStatus::Up,
//!     112,
//!     Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
//! );
//! assert!(record.is_up());
//! ```

mod id;
mod monitor;
mod record;

pub use id::*;
pub use monitor::*;
pub use record::*;
