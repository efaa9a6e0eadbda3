//! Durable key/value storage used for client-side session data.
//!
//! [`KeyValueStorage`] is the seam the client crate depends on.  The SQLite
//! implementation is used by the application; [`MemoryStorage`] backs tests
//! and throwaway sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::database::Database;
use crate::error::{Result, StoreError};

/// Synchronous string key/value storage.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Returns `true` when a value was actually removed.
    fn remove(&self, key: &str) -> Result<bool>;
}

/// [`KeyValueStorage`] backed by the SQLite [`Database`].
pub struct SqliteStorage {
    db: Mutex<Database>,
}

impl SqliteStorage {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let db = self.db.lock().map_err(|_| StoreError::LockPoisoned)?;
        db.get_value(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let db = self.db.lock().map_err(|_| StoreError::LockPoisoned)?;
        db.set_value(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let db = self.db.lock().map_err(|_| StoreError::LockPoisoned)?;
        db.remove_value(key)
    }
}

/// Volatile [`KeyValueStorage`].
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(values.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(storage: &dyn KeyValueStorage) {
        assert_eq!(storage.get("k").unwrap(), None);
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        assert!(storage.remove("k").unwrap());
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn memory_storage_behaves_like_a_map() {
        exercise(&MemoryStorage::new());
    }

    #[test]
    fn sqlite_storage_behaves_like_a_map() {
        exercise(&SqliteStorage::new(Database::open_in_memory().unwrap()));
    }
}
