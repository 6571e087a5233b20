//! Persisted client-side state: session tokens and the settings blob.

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "adminAccess";

/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "adminRefresh";

/// Storage key of the last-synced settings blob.
pub const SETTINGS_KEY: &str = "adminSettings";

/// Backend trait for key/value storage.
///
/// Implementations handle raw string storage/retrieval.
/// [`Storage`] wraps this with typed JSON access.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Get the value for a key.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Set the value for a key.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Typed storage provider.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn StorageBackend>,
}

impl Storage {
    /// Create a storage provider over the given backend.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Create an in-memory storage provider.
    pub fn memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Get a raw string value.
    pub async fn get_string(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.backend.get(key).await
    }

    /// Set a raw string value.
    pub async fn set_string(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        self.backend.set(key, value.into()).await
    }

    /// Get a JSON-encoded value.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.backend.get(key).await? {
            Some(raw) => Ok(Some(
                serde_json::from_str(&raw).map_err(StorageError::Deserialization)?,
            )),
            None => Ok(None),
        }
    }

    /// Set a JSON-encoded value.
    pub async fn set_json<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(StorageError::Serialization)?;
        self.backend.set(key, raw).await
    }

    /// Delete a key.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.backend.delete(key).await
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}
