//! `PostgreSQL` implementation of the key-value store.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use warmarch_core::error::EngineError;
use warmarch_core::store::KeyValueStore;

/// PostgreSQL-backed key-value store over the `game_records` table.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `game_records` table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Storage` if the DDL fails.
    pub async fn ensure_schema(&self) -> Result<(), EngineError> {
        sqlx::raw_sql(crate::schema::CREATE_GAME_RECORDS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| EngineError::Storage(e.to_string()))?;
        Ok(())
    }
}

fn escape_like(prefix: &str) -> String {
    prefix
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl KeyValueStore for PgStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, EngineError> {
        let row = sqlx::query("SELECT value FROM game_records WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| EngineError::Storage(e.to_string()))?;
        row.map(|r| r.try_get::<serde_json::Value, _>("value"))
            .transpose()
            .map_err(|e| EngineError::Storage(e.to_string()))
    }

    async fn put(&self, key: &str, value: serde_json::Value) -> Result<(), EngineError> {
        sqlx::query(
            "INSERT INTO game_records (key, value, updated_at)
             VALUES ($1, $2, NOW())
             ON CONFLICT (key)
             DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| EngineError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), EngineError> {
        sqlx::query("DELETE FROM game_records WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| EngineError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<String>, EngineError> {
        let pattern = format!("{}%", escape_like(prefix));
        let rows = sqlx::query("SELECT key FROM game_records WHERE key LIKE $1 ORDER BY key")
            .bind(pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| EngineError::Storage(e.to_string()))?;
        rows.into_iter()
            .map(|row| {
                row.try_get::<String, _>("key")
                    .map_err(|e| EngineError::Storage(e.to_string()))
            })
            .collect()
    }
}
