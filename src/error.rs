//! Error types for the task sync layer.
//!
//! Two conditions cross to the rendering layer:
//! - MissingCredentials: local pre-flight check failed; never reached
//!   the network. The fix is configuration, not a retry.
//! - Api: the remote rejected the call, or the transport failed before
//!   a response arrived. Carries whatever diagnostics were received.
//!
//! A record with no classifiable section is not an error at all — it
//! is silently dropped during grouping.

use thiserror::Error;

/// Error types surfaced by the sync engine.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Notion credentials not configured")]
    MissingCredentials,

    #[error("Notion API error: {message}")]
    Api {
        message: String,
        /// HTTP status of the failing call, when a response arrived.
        status: Option<u16>,
        /// Remote error body, for diagnostics and user messaging.
        detail: serde_json::Value,
    },
}

impl SyncError {
    /// HTTP status of the failing remote call, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            SyncError::Api { status, .. } => *status,
            SyncError::MissingCredentials => None,
        }
    }

    /// True when the resolution is pointing the user at settings
    /// rather than retrying.
    pub fn is_configuration(&self) -> bool {
        matches!(self, SyncError::MissingCredentials)
    }
}
