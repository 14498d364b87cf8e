//! Namespaced JSON storage over the browser's `localStorage`.
//!
//! Every key is prefixed (`escapeGame_` by default) and every value is JSON.
//! The helper never fails: a store that throws (disabled storage, quota,
//! private mode) is logged and the value is kept in an in-memory fallback
//! for the rest of the page lifetime.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::CONFIG;
use crate::diag;
use crate::error::StorageError;

/// Raw string key-value backend.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`, resolved on every call so a store that becomes
/// unavailable mid-session is reported rather than cached.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStore;

fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .ok_or(StorageError::Unavailable)?
        .local_storage()
        .map_err(|e| StorageError::from_js(&e))?
        .ok_or(StorageError::Unavailable)
}

impl KeyValueStore for BrowserStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        local_storage()?.get_item(key).map_err(|e| StorageError::from_js(&e))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::from_js(&e))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        local_storage()?
            .remove_item(key)
            .map_err(|e| StorageError::from_js(&e))
    }
}

/// Plain in-memory backend. Used natively and wherever a page wants
/// storage that does not outlive it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw (already prefixed, JSON-encoded) value, if any.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Namespaced JSON helper with an in-memory fallback.
pub struct Storage<S: KeyValueStore = BrowserStore> {
    store: S,
    prefix: &'static str,
    // Values whose write to `store` failed; newer than whatever the store holds.
    fallback: RefCell<HashMap<String, String>>,
}

impl Storage<BrowserStore> {
    /// Storage over `localStorage` with the configured prefix.
    pub fn browser() -> Self {
        Storage::new(BrowserStore, CONFIG.storage.prefix)
    }
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(store: S, prefix: &'static str) -> Self {
        Self {
            store,
            prefix,
            fallback: RefCell::new(HashMap::new()),
        }
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Stores `value` as JSON under the namespaced `key`.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let full = self.namespaced(key);
        let encoded = match serde_json::to_string(value) {
            Ok(s) => s,
            Err(e) => {
                diag::warn(&format!("storage: cannot encode '{full}': {}", StorageError::from(e)));
                return;
            }
        };
        match self.store.set_item(&full, &encoded) {
            Ok(()) => {
                self.fallback.borrow_mut().remove(&full);
            }
            Err(e) => {
                diag::warn(&format!("storage: write of '{full}' failed, keeping it in memory: {e}"));
                self.fallback.borrow_mut().insert(full, encoded);
            }
        }
    }

    /// Reads and decodes `key`, returning `default` when it is missing,
    /// unreadable or not valid JSON for `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let full = self.namespaced(key);
        if let Some(raw) = self.fallback.borrow().get(&full) {
            return decode(&full, raw).unwrap_or(default);
        }
        match self.store.get_item(&full) {
            Ok(Some(raw)) if !raw.is_empty() => decode(&full, &raw).unwrap_or(default),
            Ok(_) => default,
            Err(e) => {
                diag::warn(&format!("storage: read of '{full}' failed: {e}"));
                default
            }
        }
    }

    pub fn remove(&self, key: &str) {
        let full = self.namespaced(key);
        self.fallback.borrow_mut().remove(&full);
        if let Err(e) = self.store.remove_item(&full) {
            diag::warn(&format!("storage: remove of '{full}' failed: {e}"));
        }
    }
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(v) => Some(v),
        Err(e) => {
            diag::warn(&format!("storage: ignoring '{key}': {}", StorageError::from(e)));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Reads work, writes throw, like a full quota.
    #[derive(Default)]
    struct QuotaExceeded {
        inner: MemoryStore,
        write_attempts: Cell<u32>,
    }

    impl KeyValueStore for QuotaExceeded {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key)
        }
        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            self.write_attempts.set(self.write_attempts.get() + 1);
            Err(StorageError::Js("QuotaExceededError".into()))
        }
        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove_item(key)
        }
    }

    struct Disabled;

    impl KeyValueStore for Disabled {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }
        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn keys_are_prefixed_and_values_json() {
        let storage = Storage::new(MemoryStore::new(), "escapeGame_");
        storage.set("theme", "light");
        assert_eq!(storage.backend().raw("escapeGame_theme").as_deref(), Some("\"light\""));
        assert_eq!(storage.get("theme", String::from("dark")), "light");
    }

    #[test]
    fn missing_key_yields_default() {
        let storage = Storage::new(MemoryStore::new(), "p_");
        assert_eq!(storage.get::<Vec<String>>("achievements", Vec::new()), Vec::<String>::new());
    }

    #[test]
    fn failed_write_is_served_from_memory() {
        let storage = Storage::new(QuotaExceeded::default(), "p_");
        storage.set("theme", "light");
        assert_eq!(storage.backend().write_attempts.get(), 1);
        assert_eq!(storage.get("theme", String::from("dark")), "light");
    }

    #[test]
    fn disabled_store_never_panics() {
        let storage = Storage::new(Disabled, "p_");
        storage.set("achievements", &vec!["first_question"]);
        storage.remove("progress");
        let ids: Vec<String> = storage.get("achievements", Vec::new());
        assert_eq!(ids, vec!["first_question".to_string()]);
    }

    #[test]
    fn corrupt_value_falls_back_to_default() {
        let storage = Storage::new(MemoryStore::new(), "p_");
        storage.backend().set_item("p_theme", "{not json").unwrap();
        assert_eq!(storage.get("theme", String::from("dark")), "dark");
    }

    #[test]
    fn remove_clears_value() {
        let storage = Storage::new(MemoryStore::new(), "p_");
        storage.set("theme", "light");
        storage.remove("theme");
        assert_eq!(storage.get("theme", String::from("dark")), "dark");
    }
}
