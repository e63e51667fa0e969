//! Error types for store access.

use thiserror::Error;

/// Errors that can occur when talking to a monitor store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store answered with a non-success status.
    #[error("store returned {status}: {message}")]
    Http { status: u16, message: String },

    /// The requested monitor does not exist (or is not visible to this session).
    #[error("not found: {0}")]
    NotFound(String),

    /// The store refused the mutation because it conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The session token was rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("request timed out")]
    Timeout,

    /// Failed to parse response.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The store is offline or could not be read.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Classify a non-success HTTP status and the server's message.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => StoreError::Auth(message),
            404 => StoreError::NotFound(message),
            409 => StoreError::Conflict(message),
            _ => StoreError::Http { status, message },
        }
    }

    /// True for not-found and conflict answers, which describe the data
    /// rather than the transport.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::Conflict(_))
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout
        } else if err.is_connect() {
            StoreError::Connection(err.to_string())
        } else if err.is_decode() {
            StoreError::Parse(err.to_string())
        } else {
            StoreError::Http {
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                message: err.to_string(),
            }
        }
    }
}
