//! # sitewatch-store
//!
//! Access to the store that owns monitors and their health records.
//!
//! The store is an external collaborator: monitors are persisted there and
//! an external prober appends health records to it. This crate defines the
//! [`MonitorStore`] seam the sitewatch engine talks through, plus two
//! implementations:
//!
//! - **HTTP** (`http` feature, on by default) - [`HttpStore`] speaks the
//!   monitor REST API (`/monitor`, `/monitor/{id}`, `/monitor/{id}/history`)
//! - **In-memory** - [`MemoryStore`], for tests and demos; it also plays the
//!   prober's role through [`MemoryStore::record`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sitewatch_store::{HttpStore, MonitorStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = HttpStore::builder()
//!         .endpoint("http://localhost:3001/api")
//!         .token("session-token")
//!         .build()?;
//!
//!     for monitor in store.list_monitors().await? {
//!         println!("{} every {}s", monitor.url, monitor.interval);
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;

pub mod error;
pub mod memory;

#[cfg(feature = "http")]
pub mod http;

pub use error::StoreError;
pub use memory::MemoryStore;

#[cfg(feature = "http")]
pub use http::{HttpStore, HttpStoreBuilder};

// Re-export types for convenience
pub use sitewatch_types::{CheckStatus, HealthRecord, Id, Monitor, MonitorId, NewMonitor, RecordId};

/// Default number of records requested for a history window.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// The operations the engine needs from a monitor store.
///
/// A store instance is bound to one session: it only ever returns the
/// monitors owned by that session.
#[async_trait]
pub trait MonitorStore: Send + Sync + std::fmt::Debug {
    /// All monitors of the session.
    async fn list_monitors(&self) -> Result<Vec<Monitor>, StoreError>;

    /// Persist a new monitor and return it with its assigned id.
    async fn create_monitor(&self, monitor: &NewMonitor) -> Result<Monitor, StoreError>;

    /// Delete a monitor. Unknown ids yield [`StoreError::NotFound`].
    async fn delete_monitor(&self, id: &MonitorId) -> Result<(), StoreError>;

    /// The most recent `limit` records of a monitor, newest first.
    async fn fetch_history(
        &self,
        id: &MonitorId,
        limit: usize,
    ) -> Result<Vec<HealthRecord>, StoreError>;

    /// Human-readable description of where data comes from.
    fn description(&self) -> &str;
}
