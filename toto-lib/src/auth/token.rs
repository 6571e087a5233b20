//! Session tokens and the TokenRefresher trait

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::error::AuthError;

/// The access/refresh credential pair used by the client.
///
/// Populated on login, read on every request, rewritten on a successful
/// refresh and cleared when the session ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    /// Bearer token attached to every request.
    pub access_token: Option<String>,
    /// Token exchanged for a new access token on `401 Unauthorized`.
    pub refresh_token: Option<String>,
}

impl SessionTokens {
    /// Creates a token pair.
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token,
        }
    }

    /// Returns `true` if neither token is present.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Tokens issued by a successful refresh.
///
/// The backend may rotate the refresh token; when it does not, the previous
/// one stays valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssuedTokens {
    #[serde(alias = "access", alias = "accessToken")]
    pub access_token: String,
    #[serde(default, alias = "refresh", alias = "refreshToken")]
    pub refresh_token: Option<String>,
}

impl IssuedTokens {
    /// Merges the issued tokens over the previous refresh token.
    pub fn into_session(self, previous_refresh: String) -> SessionTokens {
        SessionTokens {
            access_token: Some(self.access_token),
            refresh_token: Some(self.refresh_token.unwrap_or(previous_refresh)),
        }
    }
}

/// Trait for exchanging a refresh token for new tokens.
///
/// [`RefreshEndpoint`](super::RefreshEndpoint) is the HTTP implementation;
/// the session only sees this trait.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Exchanges `refresh_token` for a new access token.
    async fn refresh(&self, refresh_token: &str) -> Result<IssuedTokens, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_tokens_accept_short_and_long_names() {
        let short: IssuedTokens = serde_json::from_str(r#"{"access": "a1", "refresh": "r1"}"#).unwrap();
        let long: IssuedTokens =
            serde_json::from_str(r#"{"accessToken": "a1", "refreshToken": "r1"}"#).unwrap();
        assert_eq!(short, long);
    }

    #[test]
    fn test_missing_rotation_keeps_previous_refresh() {
        let issued: IssuedTokens = serde_json::from_str(r#"{"access": "a2"}"#).unwrap();
        let session = issued.into_session("r1".into());
        assert_eq!(session, SessionTokens::new("a2", Some("r1".into())));
    }
}
