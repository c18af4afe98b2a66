//! # Device Storage
//!
//! A string key-value store local to the device: the contract the session
//! store is written against.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     trait DeviceStorage                                 │
//! │            get(key) / set(key, value) / remove(key)                    │
//! │                 │                               │                       │
//! │                 ▼                               ▼                       │
//! │   SqliteDeviceStorage                 MemoryDeviceStorage               │
//! │   device_storage table                tokio Mutex<HashMap>              │
//! │   survives restarts                   tests and throwaway terminals     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::DbResult;

/// Key-value storage owned by this device.
#[async_trait]
pub trait DeviceStorage: Send + Sync {
    /// The value under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> DbResult<()>;

    /// Deletes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> DbResult<()>;
}

// =============================================================================
// SQLite
// =============================================================================

/// Device storage in the `device_storage` table.
#[derive(Debug, Clone)]
pub struct SqliteDeviceStorage {
    pool: SqlitePool,
}

impl SqliteDeviceStorage {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteDeviceStorage { pool }
    }
}

#[async_trait]
impl DeviceStorage for SqliteDeviceStorage {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM device_storage WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        debug!(key = %key, found = value.is_some(), "Device storage read");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO device_storage (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(key = %key, "Device storage write");
        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM device_storage WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(key = %key, removed = result.rows_affected(), "Device storage delete");
        Ok(())
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Device storage that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryDeviceStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryDeviceStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeviceStorage for MemoryDeviceStorage {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
