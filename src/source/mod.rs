//! Where monitors and history come from.
//!
//! The store seam itself is [`MonitorStore`] from `sitewatch-store`. This
//! module adds a JSON-file implementation for offline use and the
//! [`HistoryFeed`] that runs history fetches in the background.

mod feed;
mod file;

pub use feed::{FetchResult, HistoryFeed};
pub use file::FileStore;

pub use sitewatch_store::{HttpStore, MemoryStore, MonitorStore, StoreError};
