//! `window.localStorage` binding

use super::KeyValueStore;
use crate::error::{CoreError, CoreResult};
use web_sys::Storage;

/// Browser local storage
///
/// Holds no handle of its own; the `Storage` object is looked up on every
/// call so the type stays `Send + Sync`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> CoreResult<Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| CoreError::storage("localStorage is not available"))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| CoreError::storage(format!("failed to read {key}")))
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| CoreError::storage(format!("failed to write {key}")))
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        Self::storage()?
            .remove_item(key)
            .map_err(|_| CoreError::storage(format!("failed to remove {key}")))
    }
}
