//! Authentication error types

use super::StorageError;

/// Errors that end a recovery cycle.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No refresh token is stored.
    #[error("No refresh token available")]
    MissingRefreshToken,

    /// The refresh endpoint rejected the refresh token.
    #[error("Token refresh rejected (HTTP {status})")]
    RefreshRejected {
        /// HTTP status code of the refresh call.
        status: u16,
        /// Message extracted from the error envelope, if any.
        message: Option<String>,
    },

    /// Network error during the refresh call.
    #[error("Network error during refresh: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to parse the refresh response.
    #[error("Refresh response parse error: {0}")]
    Parse(String),

    /// Failed to read or persist tokens.
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Returns the HTTP status code of a rejected refresh.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RefreshRejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the envelope message of a rejected refresh.
    pub fn envelope_message(&self) -> Option<&str> {
        match self {
            Self::RefreshRejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
