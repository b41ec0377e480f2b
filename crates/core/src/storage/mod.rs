//! SQLite storage layer for Sede
//!
//! Two key/value scopes mirror browser storage: `local` for preferences that
//! survive restarts and `session` for data tied to the logged-in user.

mod kv;
mod migrations;
mod traits;

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::instrument;

use crate::error::Result;

pub use kv::{KvStore, StorageScope};
pub use traits::KeyValueStore;

/// Main database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(mut conn: Connection) -> Result<Self> {
        migrations::run_migrations(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Preferences that survive restarts
    pub fn local(&self) -> KvStore {
        KvStore::new(self.conn.clone(), StorageScope::Local)
    }

    /// Values bound to the current login
    pub fn session(&self) -> KvStore {
        KvStore::new(self.conn.clone(), StorageScope::Session)
    }
}
