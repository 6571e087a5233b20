//! HTTP refresh call

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::IssuedTokens;
use super::TokenRefresher;
use crate::config::BaseUrl;
use crate::error::AuthError;
use crate::error::ErrorEnvelope;

/// Path of the refresh endpoint, relative to the API base URL.
pub const REFRESH_PATH: &str = "/admin/refresh";

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Refreshes tokens through `POST /admin/refresh`.
///
/// The call carries only the refresh token in its body, never a bearer
/// token.
#[derive(Debug, Clone)]
pub struct RefreshEndpoint {
    http_client: reqwest::Client,
    url: String,
    timeout: Option<Duration>,
}

impl RefreshEndpoint {
    /// Creates a refresher against the given API base URL.
    pub fn new(http_client: reqwest::Client, base_url: &BaseUrl) -> Self {
        Self {
            http_client,
            url: base_url.join(REFRESH_PATH),
            timeout: None,
        }
    }

    /// Sets the request timeout for the refresh call.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl TokenRefresher for RefreshEndpoint {
    async fn refresh(&self, refresh_token: &str) -> Result<IssuedTokens, AuthError> {
        let mut request = self.http_client.post(&self.url).json(&RefreshRequest {
            refresh: refresh_token,
        });
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| AuthError::Parse(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(AuthError::RefreshRejected {
                status: status.as_u16(),
                message: ErrorEnvelope::message_from(&body),
            })
        }
    }
}
