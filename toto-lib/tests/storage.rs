//! Integration tests for the SQLite storage backend.

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use tempfile::TempDir;
use toto_lib::auth::IssuedTokens;
use toto_lib::auth::Session;
use toto_lib::auth::SessionTokens;
use toto_lib::auth::TokenRefresher;
use toto_lib::error::AuthError;
use toto_lib::storage::ACCESS_TOKEN_KEY;
use toto_lib::storage::SqliteStorage;
use toto_lib::storage::Storage;
use toto_lib::storage::StorageBackend;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Blob {
    name: String,
    count: u32,
}

struct NoRefresh;

#[async_trait]
impl TokenRefresher for NoRefresh {
    async fn refresh(&self, _refresh_token: &str) -> Result<IssuedTokens, AuthError> {
        Err(AuthError::MissingRefreshToken)
    }
}

#[tokio::test]
async fn test_values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.db");

    {
        let storage = SqliteStorage::open(&path).await.unwrap();
        storage.set("greeting", "namaste".to_string()).await.unwrap();
        storage.set("greeting", "hello".to_string()).await.unwrap();
    }

    let storage = SqliteStorage::open(&path).await.unwrap();
    assert_eq!(
        storage.get("greeting").await.unwrap().as_deref(),
        Some("hello")
    );
    assert_eq!(storage.get("missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_delete_removes_value() {
    let dir = TempDir::new().unwrap();
    let storage = SqliteStorage::open(dir.path().join("session.db"))
        .await
        .unwrap();

    storage.set("k", "v".to_string()).await.unwrap();
    storage.delete("k").await.unwrap();

    assert_eq!(storage.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn test_json_through_storage() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(
        SqliteStorage::open(dir.path().join("session.db"))
            .await
            .unwrap(),
    );

    let blob = Blob {
        name: "pricing".into(),
        count: 3,
    };
    storage.set_json("blob", &blob).await.unwrap();

    assert_eq!(storage.get_json::<Blob>("blob").await.unwrap(), Some(blob));
}

#[tokio::test]
async fn test_session_tokens_persist() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.db");

    {
        let storage = Storage::new(SqliteStorage::open(&path).await.unwrap());
        let session = Session::new(storage, NoRefresh);
        session
            .sign_in(SessionTokens::new("a1", Some("r1".to_string())))
            .await
            .unwrap();
    }

    let storage = Storage::new(SqliteStorage::open(&path).await.unwrap());
    assert_eq!(
        storage.get_string(ACCESS_TOKEN_KEY).await.unwrap().as_deref(),
        Some("a1")
    );

    let session = Session::new(storage, NoRefresh);
    let tokens = session.tokens().await.unwrap();
    assert_eq!(tokens.refresh_token.as_deref(), Some("r1"));
}
