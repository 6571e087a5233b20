//! In-memory storage backend.

use async_trait::async_trait;
use dashmap::DashMap;

use super::StorageBackend;
use crate::error::StorageError;

/// Process-local storage. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde::Serialize;

    use super::super::Storage;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Blob {
        fare: f64,
    }

    #[tokio::test]
    async fn test_string_and_json_values() {
        let storage = Storage::memory();
        assert_eq!(storage.get_string("adminAccess").await.unwrap(), None);

        storage.set_string("adminAccess", "abc").await.unwrap();
        assert_eq!(storage.get_string("adminAccess").await.unwrap().as_deref(), Some("abc"));

        storage.set_json("blob", &Blob { fare: 12.5 }).await.unwrap();
        assert_eq!(storage.get_json::<Blob>("blob").await.unwrap(), Some(Blob { fare: 12.5 }));

        storage.delete("adminAccess").await.unwrap();
        storage.delete("never-set").await.unwrap();
        assert_eq!(storage.get_string("adminAccess").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_bad_json_is_an_error() {
        let storage = Storage::memory();
        storage.set_string("blob", "not json").await.unwrap();
        assert!(storage.get_json::<Blob>("blob").await.is_err());
    }
}
