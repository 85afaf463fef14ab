//! Typed key-value store over the `kv_store` table.
//!
//! Values are JSON text. A value that no longer decodes as the requested type is
//! treated as absent: callers get their fallback and a warning is logged. Only a
//! failing database surfaces as an error.

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::SqlitePool;
use tokio::sync::{Mutex, MutexGuard};

use crate::errors::AppError;

/// Storage keys used by the application.
pub mod keys {
    pub const CLIPS: &str = "cc_clips";
    pub const CARROTS: &str = "cc_carrots";
    pub const RESETS: &str = "cc_resets";
    pub const SETTINGS: &str = "cc_settings";

    /// Every key owned by the application, in wipe order.
    pub const ALL: [&str; 4] = [CLIPS, CARROTS, RESETS, SETTINGS];
}

/// Outcome of reading a key.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Present(T),
    Absent,
    /// Stored text exists but does not decode; carries the decoder message.
    Corrupt(String),
}

/// Persistent store handle, shared by every component.
pub struct Store {
    pool: SqlitePool,
    write_lock: Mutex<()>,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Mutex::new(()),
        }
    }

    /// Serialise a read-modify-write sequence.
    ///
    /// Hold the returned guard across the read and the write so concurrent
    /// requests observe each other's writes in order.
    pub async fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Read and decode the value under `key`.
    pub async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Result<Lookup<T>, AppError> {
        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match raw {
            None => Lookup::Absent,
            Some(text) => match serde_json::from_str(&text) {
                Ok(value) => Lookup::Present(value),
                Err(e) => Lookup::Corrupt(e.to_string()),
            },
        })
    }

    /// Read `key`, substituting `fallback` when it is absent or undecodable.
    pub async fn get<T: DeserializeOwned>(&self, key: &str, fallback: T) -> Result<T, AppError> {
        match self.lookup(key).await? {
            Lookup::Present(value) => Ok(value),
            Lookup::Absent => Ok(fallback),
            Lookup::Corrupt(reason) => {
                tracing::warn!(key, %reason, "Stored value is corrupt, using fallback");
                Ok(fallback)
            }
        }
    }

    /// Encode `value` as JSON and write it under `key`.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let text = serde_json::to_string(value)?;
        self.write_raw(key, &text).await
    }

    /// Write several keys in one transaction. Either all land or none do.
    pub async fn set_many(&self, entries: &[(&str, serde_json::Value)]) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        for (key, value) in entries {
            sqlx::query(UPSERT_SQL)
                .bind(*key)
                .bind(value.to_string())
                .bind(&now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete several keys in one transaction.
    pub async fn remove_many(&self, keys: &[&str]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for key in keys {
            sqlx::query("DELETE FROM kv_store WHERE key = ?")
                .bind(*key)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub(crate) async fn write_raw(&self, key: &str, text: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(UPSERT_SQL)
            .bind(key)
            .bind(text)
            .bind(&now)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

const UPSERT_SQL: &str = "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";


#[cfg(test)]
mod tests {
    use super::test_support::temp_store;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_and_get_round_trip() {
        let (store, _dir) = temp_store().await;

        store.set("foo", &json!({"a": 1})).await.unwrap();
        let value: serde_json::Value = store.get("foo", json!({})).await.unwrap();
        assert_eq!(value, json!({"a": 1}));

        store.set("list", &vec!["x", "y"]).await.unwrap();
        let list: Vec<String> = store.get("list", Vec::new()).await.unwrap();
        assert_eq!(list, vec!["x".to_string(), "y".to_string()]);

        store.set("n", &42u64).await.unwrap();
        assert_eq!(store.get("n", 0u64).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_fallback_when_missing() {
        let (store, _dir) = temp_store().await;

        assert_eq!(store.get("missing", 42u64).await.unwrap(), 42);
        assert_eq!(
            store.lookup::<u64>("missing").await.unwrap(),
            Lookup::Absent
        );
    }

    #[tokio::test]
    async fn test_corrupt_value_falls_back() {
        let (store, _dir) = temp_store().await;

        store.write_raw(keys::CARROTS, "{not json").await.unwrap();
        assert_eq!(store.get(keys::CARROTS, 7u64).await.unwrap(), 7);
        assert!(matches!(
            store.lookup::<u64>(keys::CARROTS).await.unwrap(),
            Lookup::Corrupt(_)
        ));

        // Valid JSON of the wrong shape is corrupt too
        store.write_raw(keys::CARROTS, "\"ten\"").await.unwrap();
        assert_eq!(store.get(keys::CARROTS, 0u64).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let (store, _dir) = temp_store().await;

        store.set("k", &1u64).await.unwrap();
        store.set("k", &2u64).await.unwrap();
        assert_eq!(store.get("k", 0u64).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_set_many_and_remove_many() {
        let (store, _dir) = temp_store().await;

        store
            .set_many(&[
                (keys::CARROTS, json!(3)),
                (keys::RESETS, json!(1)),
                (keys::CLIPS, json!([])),
            ])
            .await
            .unwrap();
        assert_eq!(store.get(keys::CARROTS, 0u64).await.unwrap(), 3);
        assert_eq!(store.get(keys::RESETS, 0u64).await.unwrap(), 1);

        store.set(keys::SETTINGS, &json!({"className": "1A"})).await.unwrap();
        store.remove_many(&keys::ALL).await.unwrap();
        for key in keys::ALL {
            assert_eq!(
                store.lookup::<serde_json::Value>(key).await.unwrap(),
                Lookup::Absent
            );
        }
    }
}
