//! Error types

mod api;
mod auth;
mod config;
mod envelope;
mod storage;

pub use api::*;
pub use auth::*;
pub use config::*;
pub use envelope::*;
pub use storage::*;

/// Message shown when a failure carries nothing more specific.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// Top-level error returned by client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backend rejected the request or could not be reached.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The session could not be recovered.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Reading or writing persisted state failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Client configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Message suitable for showing inline on a screen.
    ///
    /// Uses the backend's envelope message when there is one, otherwise
    /// [`FALLBACK_MESSAGE`].
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::Api(err) => err.envelope_message(),
            Self::Auth(err) => err.envelope_message(),
            _ => None,
        };
        message.unwrap_or(FALLBACK_MESSAGE).to_string()
    }

    /// Returns the HTTP status code if the backend answered with an error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(err) => err.status_code(),
            Self::Auth(err) => err.status_code(),
            _ => None,
        }
    }

    /// Returns `true` if this is a `401 Unauthorized` response.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(err) if err.status_code() == Some(401))
    }

    /// Returns `true` if the backend refused the credentials: a `401` or a
    /// rejected refresh.
    ///
    /// This does not mean the session ended; a replayed request answered
    /// `401` keeps its refreshed tokens. Check [`Session::is_ended`] for that.
    ///
    /// [`Session::is_ended`]: crate::auth::Session::is_ended
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Auth(AuthError::RefreshRejected { .. } | AuthError::MissingRefreshToken) => true,
            _ => self.is_unauthorized(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_envelope() {
        let err = Error::from(ApiError::from_body(400, r#"{"message": "Ride already removed"}"#));
        assert_eq!(err.user_message(), "Ride already removed");
        assert_eq!(err.status_code(), Some(400));
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = Error::from(ApiError::from_body(502, "<html>Bad gateway</html>"));
        assert_eq!(err.user_message(), FALLBACK_MESSAGE);

        let err = Error::from(ConfigError::InvalidUrl {
            value: "::".into(),
            reason: "relative URL without a base".into(),
        });
        assert_eq!(err.user_message(), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_unauthorized() {
        let err = Error::from(ApiError::from_body(401, ""));
        assert!(err.is_unauthorized());
        assert!(err.is_auth_failure());
        assert!(!Error::from(ApiError::from_body(403, "")).is_unauthorized());
    }

    #[test]
    fn test_auth_failure_excludes_local_faults() {
        let rejected = Error::from(AuthError::RefreshRejected {
            status: 401,
            message: None,
        });
        assert!(rejected.is_auth_failure());
        assert!(Error::from(AuthError::MissingRefreshToken).is_auth_failure());

        let parse = Error::from(AuthError::Parse("truncated body".into()));
        assert!(!parse.is_auth_failure());
        assert!(!Error::from(ApiError::from_body(500, "")).is_auth_failure());
    }
}
