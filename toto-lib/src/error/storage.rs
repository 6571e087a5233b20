//! Storage error types

/// Errors from persisted client-side state.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("deserialization error: {0}")]
    Deserialization(#[source] serde_json::Error),
}
