//! API error types

use std::time::Duration;

use super::ErrorEnvelope;

/// Errors that can occur during API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP error response from the API.
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or(body))]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error envelope, if any.
        message: Option<String>,
        /// Raw response body.
        body: String,
    },

    /// Network error during API call.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Failed to parse API response.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },
}

impl ApiError {
    /// Creates an HTTP error from a status and raw body, extracting the
    /// envelope message when the body has one.
    pub fn from_body(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self::Http {
            status,
            message: ErrorEnvelope::message_from(&body),
            body,
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Maps a transport error, separating timeouts from other failures.
    pub fn from_transport(err: reqwest::Error, timeout: Option<Duration>) -> Self {
        match timeout {
            Some(timeout) if err.is_timeout() => Self::Timeout(timeout),
            _ => Self::Network(err),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the envelope message if this is an HTTP error that carried one.
    pub fn envelope_message(&self) -> Option<&str> {
        match self {
            Self::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` if this is an authentication failure.
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err)
    }
}
