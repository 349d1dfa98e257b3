//! Persisted key-value storage
//!
//! The session survives restarts by living in a string-keyed store that is
//! owned by the environment: `localStorage` in a browser, a JSON file for the
//! command line, a plain map in tests.

#[cfg(target_arch = "wasm32")]
mod browser;
mod file;

#[cfg(target_arch = "wasm32")]
pub use browser::LocalStorage;
pub use file::FileStore;

use crate::error::{CoreError, CoreResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// String-keyed store that outlives the running process
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never written or has been removed
    fn get(&self, key: &str) -> CoreResult<Option<String>>;

    /// Write a single value
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    /// Remove a single value; removing a missing key is not an error
    fn remove(&self, key: &str) -> CoreResult<()>;

    /// Write several values as one logical update
    fn set_entries(&self, entries: &[(&str, &str)]) -> CoreResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Remove several values as one logical update
    fn remove_entries(&self, keys: &[&str]) -> CoreResult<()> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// In-process store backed by a map
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_entries<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> CoreResult<T> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::storage("memory store lock poisoned"))?;
        Ok(f(&mut entries))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }

    fn set_entries(&self, pairs: &[(&str, &str)]) -> CoreResult<()> {
        self.with_entries(|entries| {
            for (key, value) in pairs {
                entries.insert((*key).to_string(), (*value).to_string());
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("token").unwrap(), None);

        store.set("token", "abc").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));

        store.remove("token").unwrap();
        store.remove("token").unwrap();
        assert_eq!(store.get("token").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn grouped_writes_land_together() {
        let store = MemoryStore::new();
        store
            .set_entries(&[("a", "1"), ("b", "2"), ("c", "3")])
            .unwrap();
        assert_eq!(store.len(), 3);

        store.remove_entries(&["a", "c"]).unwrap();
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
    }
}
