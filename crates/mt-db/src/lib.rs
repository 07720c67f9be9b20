//! Storage layer for notification state.
//!
//! Provides a durable string-keyed store using `rusqlite`, implementing
//! [`mt_core::KeyValueStore`] so the read/dismissed sets survive restarts.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization. Read-modify-write cycles
//! performed by `mt_core::ReadStateStore` are only atomic under a single owner;
//! wrap the engine in a `Mutex` if it must be shared.
//!
//! # Schema
//!
//! One `kv` table: `key TEXT PRIMARY KEY, value TEXT NOT NULL, updated_at TEXT NOT NULL`.
//! `updated_at` is ISO 8601 UTC (e.g., `2024-01-15T10:30:00Z`) and is informational only.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use mt_core::{KeyValueStore, StorageError};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl From<DbError> for StorageError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sqlite(rusqlite::Error::SqliteFailure(code, _))
                if code.code == rusqlite::ErrorCode::DiskFull =>
            {
                Self::QuotaExceeded
            }
            other => Self::Backend(other.to_string()),
        }
    }
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        tracing::debug!(path = %path.display(), "opened database");
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Returns the value stored under `key`.
    pub fn get_value(&self, key: &str) -> Result<Option<String>, DbError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    /// Inserts or replaces the value under `key`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), DbError> {
        let updated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        self.conn.execute(
            "
            INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
            params![key, value, updated_at],
        )?;
        Ok(())
    }

    /// Deletes `key`. Missing keys are not an error.
    pub fn remove_value(&mut self, key: &str) -> Result<(), DbError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?", [key])?;
        Ok(())
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get_value(key)?)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(self.set_value(key, value)?)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        Ok(self.remove_value(key)?)
    }
}

#[cfg(test)]
mod tests {
    use mt_core::{EventId, ReadStateStore};

    use super::*;

    fn stored_keys(conn: &Connection) -> Vec<String> {
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key ASC").unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .map(Result::unwrap)
            .collect()
    }

    fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .unwrap();
        stmt.query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .map(Result::unwrap)
            .collect()
    }

    #[test]
    fn open_in_memory_database() {
        let db = Database::open_in_memory().expect("open in-memory db");
        assert!(stored_keys(&db.conn).is_empty());
    }

    #[test]
    fn schema_matches_data_model() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(
            table_columns(&db.conn, "kv"),
            vec!["key", "value", "updated_at"]
        );
    }

    #[test]
    fn set_get_remove_roundtrip() {
        let mut db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_value("a").unwrap(), None);

        db.set_value("a", "1").unwrap();
        db.set_value("a", "2").unwrap();
        assert_eq!(db.get_value("a").unwrap().as_deref(), Some("2"));
        assert_eq!(stored_keys(&db.conn), vec!["a"]);

        db.remove_value("a").unwrap();
        db.remove_value("a").unwrap();
        assert_eq!(db.get_value("a").unwrap(), None);
    }

    #[test]
    fn read_state_persists_across_reopen() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("mt.db");
        let read = EventId::new("location:1").unwrap();
        let dismissed = EventId::new("shipment:4").unwrap();

        {
            let mut store = ReadStateStore::new(Database::open(&path).unwrap());
            store.dismiss_all([&dismissed]);
            store.mark_read(&read);
        }

        let store = ReadStateStore::new(Database::open(&path).unwrap());
        assert!(store.is_read(&read));
        assert!(store.is_read(&dismissed));
        assert!(!store.is_read(&EventId::new("status:1").unwrap()));

        assert_eq!(
            stored_keys(&store.storage().conn),
            vec!["notifications.dismissed_ids", "notifications.read_ids"]
        );
    }
}
