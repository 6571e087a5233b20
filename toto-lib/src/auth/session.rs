//! The session: single owner of the persisted tokens.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use tokio::sync::Mutex;

use super::SessionTokens;
use super::TokenRefresher;
use crate::error::AuthError;
use crate::error::StorageError;
use crate::storage::ACCESS_TOKEN_KEY;
use crate::storage::REFRESH_TOKEN_KEY;
use crate::storage::Storage;

/// Shared owner of the access/refresh tokens.
///
/// Every read and write of the persisted tokens goes through here. Refreshes
/// are serialized: a caller that waited on another caller's refresh reuses
/// the token it produced instead of refreshing again, so simultaneous
/// `401`s collapse into one refresh call.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    storage: Storage,
    refresher: Arc<dyn TokenRefresher>,
    refresh_lock: Mutex<()>,
    ended: AtomicBool,
}

impl Session {
    /// Creates a session over persisted storage and a refresher.
    pub fn new(storage: Storage, refresher: impl TokenRefresher + 'static) -> Self {
        Self::with_refresher(storage, Arc::new(refresher))
    }

    /// Creates a session sharing an existing refresher.
    pub fn with_refresher(storage: Storage, refresher: Arc<dyn TokenRefresher>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                storage,
                refresher,
                refresh_lock: Mutex::new(()),
                ended: AtomicBool::new(false),
            }),
        }
    }

    /// Returns the storage backing this session.
    pub fn storage(&self) -> &Storage {
        &self.inner.storage
    }

    /// Reads the current access token.
    pub async fn access_token(&self) -> Result<Option<String>, StorageError> {
        self.inner.storage.get_string(ACCESS_TOKEN_KEY).await
    }

    /// Reads the current refresh token.
    pub async fn refresh_token(&self) -> Result<Option<String>, StorageError> {
        self.inner.storage.get_string(REFRESH_TOKEN_KEY).await
    }

    /// Reads both tokens.
    pub async fn tokens(&self) -> Result<SessionTokens, StorageError> {
        Ok(SessionTokens {
            access_token: self.access_token().await?,
            refresh_token: self.refresh_token().await?,
        })
    }

    /// Stores tokens obtained by signing in and re-arms the login redirect.
    pub async fn sign_in(&self, tokens: SessionTokens) -> Result<(), StorageError> {
        self.store(&tokens).await?;
        self.inner.ended.store(false, Ordering::SeqCst);
        log::info!("session signed in");
        Ok(())
    }

    /// Removes both tokens.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.inner.storage.delete(ACCESS_TOKEN_KEY).await?;
        self.inner.storage.delete(REFRESH_TOKEN_KEY).await
    }

    /// Marks the session as ended.
    ///
    /// Returns `true` only for the call that ended it, so the login redirect
    /// fires once per signed-in session.
    pub fn mark_ended(&self) -> bool {
        !self.inner.ended.swap(true, Ordering::SeqCst)
    }

    /// Returns `true` once the session has ended and until the next sign in.
    pub fn is_ended(&self) -> bool {
        self.inner.ended.load(Ordering::SeqCst)
    }

    /// Obtains a usable access token after `failed` was rejected.
    ///
    /// If another caller already replaced `failed` while this one waited,
    /// the replacement is returned without a refresh call. Otherwise the
    /// stored refresh token is exchanged and the new tokens persisted,
    /// keeping the previous refresh token unless a rotated one was issued.
    pub async fn refresh_after(&self, failed: Option<&str>) -> Result<String, AuthError> {
        let _guard = self.inner.refresh_lock.lock().await;

        let tokens = self.tokens().await?;
        if let Some(current) = tokens.access_token.as_deref().filter(|t| Some(*t) != failed) {
            log::debug!("access token already refreshed by a concurrent request");
            return Ok(current.to_string());
        }

        let Some(refresh_token) = tokens.refresh_token else {
            return Err(AuthError::MissingRefreshToken);
        };

        let issued = self.inner.refresher.refresh(&refresh_token).await?;
        let rotated = issued.refresh_token.is_some();
        let next = issued.into_session(refresh_token);
        self.store(&next).await?;
        log::info!("access token refreshed (refresh token rotated: {})", rotated);

        next.access_token
            .ok_or_else(|| AuthError::Parse("refresh issued no access token".to_string()))
    }

    async fn store(&self, tokens: &SessionTokens) -> Result<(), StorageError> {
        let storage = &self.inner.storage;
        match &tokens.access_token {
            Some(token) => storage.set_string(ACCESS_TOKEN_KEY, token.as_str()).await?,
            None => storage.delete(ACCESS_TOKEN_KEY).await?,
        }
        match &tokens.refresh_token {
            Some(token) => storage.set_string(REFRESH_TOKEN_KEY, token.as_str()).await?,
            None => storage.delete(REFRESH_TOKEN_KEY).await?,
        }
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("ended", &self.is_ended())
            .finish_non_exhaustive()
    }
}
