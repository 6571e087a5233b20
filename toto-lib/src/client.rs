//! Main ApiClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::auth::LoginRedirect;
use crate::auth::NoRedirect;
use crate::auth::RefreshEndpoint;
use crate::auth::Session;
use crate::auth::TokenRefresher;
use crate::config::BaseUrl;
use crate::error::ConfigError;
use crate::storage::Storage;

/// The client for the Local ToTo admin API.
///
/// Every request carries the session's bearer token; a `401 Unauthorized`
/// triggers one refresh-and-retry cycle before the error reaches the caller.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks safely.
///
/// # Example
///
/// ```ignore
/// use toto_lib::ApiClient;
/// use toto_lib::config::BaseUrlConfig;
/// use toto_lib::storage::Storage;
///
/// let client = ApiClient::builder()
///     .base_url(BaseUrlConfig::default().host("10.0.0.2").resolve()?)
///     .storage(Storage::memory())
///     .build()?;
///
/// let rides = client.rides().await?;
/// ```
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) inner: Arc<ApiClientInner>,
}

pub(crate) struct ApiClientInner {
    pub(crate) base_url: BaseUrl,
    pub(crate) session: Session,
    pub(crate) redirect: Arc<dyn LoginRedirect>,
    pub(crate) http_client: Client,
    pub(crate) timeout: Option<Duration>,
}

impl ApiClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> ApiClientBuilder<Missing, Missing> {
        ApiClientBuilder::new()
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &BaseUrl {
        &self.inner.base_url
    }

    /// Returns the session holding this client's tokens.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Returns the storage backing the session and the settings blob.
    pub fn storage(&self) -> &Storage {
        self.inner.session.storage()
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`ApiClient`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `base_url` - The resolved API base URL
/// - `storage` - Where session tokens and settings persist
///
/// # Example
///
/// ```ignore
/// let client = ApiClient::builder()
///     .base_url(base_url)
///     .storage(storage)
///     .login_redirect(TerminalRedirect)
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct ApiClientBuilder<Url, Store> {
    base_url: Url,
    storage: Store,
    redirect: Arc<dyn LoginRedirect>,
    refresher: Option<Arc<dyn TokenRefresher>>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl ApiClientBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: Missing,
            storage: Missing,
            redirect: Arc::new(NoRedirect),
            refresher: None,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }
}

impl Default for ApiClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> ApiClientBuilder<Missing, S> {
    /// Sets the API base URL.
    pub fn base_url(self, base_url: BaseUrl) -> ApiClientBuilder<Set<BaseUrl>, S> {
        ApiClientBuilder {
            base_url: Set(base_url),
            storage: self.storage,
            redirect: self.redirect,
            refresher: self.refresher,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U> ApiClientBuilder<U, Missing> {
    /// Sets the storage for session tokens and settings.
    pub fn storage(self, storage: Storage) -> ApiClientBuilder<U, Set<Storage>> {
        ApiClientBuilder {
            base_url: self.base_url,
            storage: Set(storage),
            redirect: self.redirect,
            refresher: self.refresher,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U, S> ApiClientBuilder<U, S> {
    /// Sets the navigation fired when the session cannot be recovered.
    ///
    /// Defaults to [`NoRedirect`].
    pub fn login_redirect<R: LoginRedirect + 'static>(mut self, redirect: R) -> Self {
        self.redirect = Arc::new(redirect);
        self
    }

    /// Overrides how refresh tokens are exchanged.
    ///
    /// Defaults to [`RefreshEndpoint`] on the same base URL.
    pub fn token_refresher<T: TokenRefresher + 'static>(mut self, refresher: T) -> Self {
        self.refresher = Some(Arc::new(refresher));
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl ApiClientBuilder<Set<BaseUrl>, Set<Storage>> {
    /// Builds the [`ApiClient`].
    ///
    /// This method is only available when both `base_url` and `storage` have been set.
    pub fn build(self) -> Result<ApiClient, ConfigError> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ConfigError::HttpClient)?
            }
        };

        let base_url = self.base_url.0;
        let refresher = self.refresher.unwrap_or_else(|| {
            Arc::new(RefreshEndpoint::new(http_client.clone(), &base_url).timeout(self.timeout))
        });
        let session = Session::with_refresher(self.storage.0, refresher);

        Ok(ApiClient {
            inner: Arc::new(ApiClientInner {
                base_url,
                session,
                redirect: self.redirect,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
