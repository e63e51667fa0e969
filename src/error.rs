//! Session error classes.

use thiserror::Error;

use sitewatch_store::StoreError;

/// Errors surfaced by session operations.
///
/// None of them is fatal and none leaves partial state behind: a failed
/// operation leaves the session exactly as it was.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Bad input, rejected before the store was contacted.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Listing monitors or fetching history failed.
    #[error("fetch failed: {0}")]
    Fetch(#[source] StoreError),

    /// A create or delete could not be carried out by the store.
    #[error("store request failed: {0}")]
    Transport(#[source] StoreError),

    /// Duplicate or missing monitor on mutation.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl SessionError {
    /// Classify a failed read.
    pub fn fetch(err: StoreError) -> Self {
        SessionError::Fetch(err)
    }

    /// Classify a failed create or delete.
    pub fn mutation(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) | StoreError::Conflict(msg) => SessionError::Conflict(msg),
            other => SessionError::Transport(other),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SessionError::Validation(_))
    }
}
