//! SQLite-backed key/value scopes

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::traits::KeyValueStore;
use crate::error::{Error, Result};

/// Lifetime of the values in a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    /// Survives restarts and logins (user preferences)
    Local,
    /// Bound to the logged-in session, wiped on logout
    Session,
}

impl StorageScope {
    fn table(&self) -> &'static str {
        match self {
            StorageScope::Local => "local_storage",
            StorageScope::Session => "session_storage",
        }
    }
}

/// One storage scope over a shared connection
#[derive(Clone)]
pub struct KvStore {
    conn: Arc<Mutex<Connection>>,
    scope: StorageScope,
}

impl KvStore {
    pub(crate) fn new(conn: Arc<Mutex<Connection>>, scope: StorageScope) -> Self {
        Self { conn, scope }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Io(std::io::Error::other("local store lock poisoned")))
    }
}

impl KeyValueStore for KvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let sql = format!("SELECT value FROM {} WHERE key = ?1", self.scope.table());
        let value = conn
            .query_row(&sql, params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        let sql = format!(
            "INSERT INTO {} (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            self.scope.table()
        );
        conn.execute(&sql, params![key, value, Utc::now().to_rfc3339()])?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        let sql = format!("DELETE FROM {} WHERE key = ?1", self.scope.table());
        conn.execute(&sql, params![key])?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(&format!("DELETE FROM {}", self.scope.table()), [])?;
        Ok(())
    }
}
