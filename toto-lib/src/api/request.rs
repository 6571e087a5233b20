//! Request dispatch and the refresh-and-retry cycle

use reqwest::Method;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ApiClient;
use crate::auth::LOGIN_ROUTE;
use crate::error::ApiError;
use crate::error::AuthError;
use crate::error::Error;

/// One outbound API call.
///
/// Kept as plain data so it can be replayed after a token refresh. `retried`
/// marks a request that already went through a recovery cycle; such a
/// request never starts another one.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, e.g. `/admin/rides`
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub retried: bool,
}

impl ApiRequest {
    /// Creates a request without a body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Attaches a JSON body.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::parse(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }
}

impl ApiClient {
    /// Sends a request with bearer auth and one-shot recovery on `401`.
    ///
    /// On `401 Unauthorized` for a request not yet retried, the session's
    /// refresh token is exchanged and the request replayed once with the new
    /// access token. If recovery is impossible the session ends: tokens are
    /// cleared and the login redirect fires. Every other status passes
    /// through unchanged.
    pub async fn send(&self, mut request: ApiRequest) -> Result<reqwest::Response, Error> {
        let mut token = self.inner.session.access_token().await?;

        loop {
            let response = self.dispatch(&request, token.as_deref()).await?;
            if response.status() != StatusCode::UNAUTHORIZED {
                return self.check(&request, response).await;
            }

            let rejection = self.rejection(&request, response).await;
            if request.retried {
                log::warn!(
                    "{} {} still unauthorized after refresh",
                    request.method,
                    request.path
                );
                return Err(rejection);
            }

            request.retried = true;
            token = Some(self.recover(token.as_deref(), rejection).await?);
        }
    }

    /// Sends a request and decodes the JSON response body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, Error> {
        let response = self.send(request).await?;
        let body = response.text().await.map_err(ApiError::from)?;
        serde_json::from_str(&body)
            .map_err(|e| Error::Api(ApiError::parse_with_body(e.to_string(), body)))
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<reqwest::Response, Error> {
        let url = self.inner.base_url.join(&request.path);
        log::debug!(
            "{} {}{}",
            request.method,
            url,
            if request.retried { " (retry)" } else { "" }
        );

        let mut builder = self
            .inner
            .http_client
            .request(request.method.clone(), &url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        if let Some(timeout) = self.inner.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        builder
            .send()
            .await
            .map_err(|e| Error::Api(ApiError::from_transport(e, self.inner.timeout)))
    }

    async fn check(
        &self,
        request: &ApiRequest,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, Error> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(self.rejection(request, response).await)
        }
    }

    async fn rejection(&self, request: &ApiRequest, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_body(status, body);
        log::warn!("{} {} failed: {}", request.method, request.path, err);
        Error::Api(err)
    }

    /// Runs the recovery cycle after `failed` was rejected.
    ///
    /// Returns the access token to replay with, or the error to surface.
    async fn recover(&self, failed: Option<&str>, rejection: Error) -> Result<String, Error> {
        match self.inner.session.refresh_after(failed).await {
            Ok(token) => Ok(token),
            Err(AuthError::MissingRefreshToken) => {
                log::warn!("no refresh token; ending session");
                self.end_session().await;
                Err(rejection)
            }
            Err(err) => {
                log::warn!("token refresh failed: {}; ending session", err);
                self.end_session().await;
                Err(Error::Auth(err))
            }
        }
    }

    /// Clears the tokens and fires the login redirect once.
    async fn end_session(&self) {
        let session = &self.inner.session;
        if let Err(err) = session.clear().await {
            log::error!("failed to clear session tokens: {}", err);
        }
        if session.mark_ended() {
            self.inner.redirect.redirect_to_login(LOGIN_ROUTE);
        }
    }
}
