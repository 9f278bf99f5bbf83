// src/store/sqlite.rs

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use super::{KvStore, StorageError};

/// Key-value store in a local SQLite file (one row per key, JSON text values).
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens the database at `url` and applies migrations.
    ///
    /// An in-memory database lives inside a single connection, so the pool is
    /// pinned to one connection that is never recycled.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = options
            .acquire_timeout(Duration::from_secs(3))
            .connect(url)
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl KvStore for SqliteStore {
    async fn load(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load '{}': {:?}", key, e);
                StorageError::from(e)
            })?;

        raw.map(|text| serde_json::from_str(&text).map_err(|e| StorageError::corrupt(key, e)))
            .transpose()
    }

    async fn save(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(key)
        .bind(value.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save '{}': {:?}", key, e);
            StorageError::from(e)
        })?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
