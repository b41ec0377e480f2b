//! Storage traits
//!
//! Persistence is a string key/value interface so the selection holder and
//! the auth layer do not depend on SQLite directly.

use crate::error::Result;

/// Persistent string key/value storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace
    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Remove every key in this store
    fn clear(&self) -> Result<()>;
}
