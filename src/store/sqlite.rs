use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};

use crate::app::{ReelfeedError, Result};
use crate::store::TokenStorage;

/// Key-value storage in a single SQLite table.
pub struct SqliteTokenStorage {
    conn: Mutex<Connection>,
}

impl SqliteTokenStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|e| ReelfeedError::Storage(format!("migration failed: {}", e)))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ReelfeedError::Storage(e.to_string()))
    }
}

#[async_trait]
impl TokenStorage for SqliteTokenStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        tracing::debug!("Stored value for {}", key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AUTH_TOKEN_KEY;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = SqliteTokenStorage::in_memory().unwrap();
        store.set(AUTH_TOKEN_KEY, "token-1").await.unwrap();
        assert_eq!(
            store.get(AUTH_TOKEN_KEY).await.unwrap(),
            Some("token-1".into())
        );
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = SqliteTokenStorage::in_memory().unwrap();
        store.set(AUTH_TOKEN_KEY, "token-1").await.unwrap();
        store.set(AUTH_TOKEN_KEY, "token-2").await.unwrap();
        assert_eq!(
            store.get(AUTH_TOKEN_KEY).await.unwrap(),
            Some("token-2".into())
        );
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let store = SqliteTokenStorage::in_memory().unwrap();
        store.remove("missing").await.unwrap();
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reelfeed.db");

        {
            let store = SqliteTokenStorage::new(&path).unwrap();
            store.set(AUTH_TOKEN_KEY, "persisted").await.unwrap();
        }

        let reopened = SqliteTokenStorage::new(&path).unwrap();
        assert_eq!(
            reopened.get(AUTH_TOKEN_KEY).await.unwrap(),
            Some("persisted".into())
        );
    }
}
