//! Error types for the sync engine

/// Errors surfaced by a sync invocation
///
/// Fetcher errors (`Transport`, `Decode`) pass through the sync loops
/// unchanged, so callers can match on them directly.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Bad caller input; the loop never started
    #[error("Invalid sync request: {0}")]
    Validation(String),

    /// The network call failed or returned a non-success status
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body did not have the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The record store rejected a write
    #[error("Record store error: {0}")]
    Store(#[from] anyhow::Error),

    /// The invocation was cancelled through its token
    #[error("Sync cancelled")]
    Cancelled,

    /// The background sync thread could not be started
    #[error("Failed to start sync thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The background sync thread panicked
    #[error("Sync task panicked")]
    TaskPanicked,
}

impl SyncError {
    /// Whether this error came from the network layer
    pub fn is_transport(&self) -> bool {
        matches!(self, SyncError::Transport(_))
    }
}

impl From<ureq::Error> for SyncError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(code) => {
                SyncError::Transport(format!("server returned HTTP {}", code))
            }
            other => SyncError::Transport(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Decode(e.to_string())
    }
}

/// Error returned when `next()` is called on an exhausted iterator
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("No more records in iterator")]
pub struct ExhaustedError;
