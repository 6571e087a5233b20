//! SQLite key/value backend

use std::path::Path;

use async_sqlite::Client;
use async_sqlite::ClientBuilder;
use async_trait::async_trait;
use dashmap::DashMap;

use super::StorageBackend;
use crate::error::StorageError;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

const SELECT_VALUE: &str = "SELECT value FROM kv WHERE key = ?1";

const UPSERT_VALUE: &str = "INSERT INTO kv (key, value, updated_at)
    VALUES (?1, ?2, CURRENT_TIMESTAMP)
    ON CONFLICT(key) DO UPDATE
    SET value = excluded.value, updated_at = excluded.updated_at";

const DELETE_VALUE: &str = "DELETE FROM kv WHERE key = ?1";

/// Session database: a single `kv` table behind a read-through cache.
///
/// The cache only ever holds values that were read from or written to the
/// table by this instance, so one database file should have one
/// `SqliteStorage` at a time.
pub struct SqliteStorage {
    db: Client,
    cache: DashMap<String, String>,
}

impl SqliteStorage {
    /// Opens the database at `path`, creating the file and table if needed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = ClientBuilder::new().path(path.as_ref()).open().await?;
        db.conn(|conn| conn.execute_batch(SCHEMA)).await?;
        log::debug!("opened session database at {}", path.as_ref().display());

        Ok(Self {
            db,
            cache: DashMap::new(),
        })
    }
}

#[async_trait]
impl StorageBackend for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if let Some(hit) = self.cache.get(key) {
            return Ok(Some(hit.value().clone()));
        }

        let lookup = key.to_owned();
        let stored: Option<String> = self
            .db
            .conn(move |conn| {
                let mut stmt = conn.prepare_cached(SELECT_VALUE)?;
                let mut rows = stmt.query([lookup.as_str()])?;
                rows.next()?.map(|row| row.get(0)).transpose()
            })
            .await?;

        if let Some(value) = &stored {
            self.cache.insert(key.to_owned(), value.clone());
        }
        Ok(stored)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let params = (key.to_owned(), value.clone());
        self.db
            .conn(move |conn| conn.execute(UPSERT_VALUE, [params.0.as_str(), params.1.as_str()]))
            .await?;

        self.cache.insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let doomed = key.to_owned();
        self.db
            .conn(move |conn| conn.execute(DELETE_VALUE, [doomed.as_str()]))
            .await?;

        self.cache.remove(key);
        Ok(())
    }
}
