//! In-memory store with change tracking.

use std::collections::{BTreeMap, BTreeSet};

use super::{LocalStore, StorageError};

/// In-memory [`LocalStore`].
///
/// Remembers which keys were written or removed since the last
/// [`MemoryStore::take_dirty`], so a caller holding a snapshot can push only
/// those keys back to the real backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    dirty: BTreeSet<String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without marking it dirty.
    pub fn preload(&mut self, key: impl Into<String>, value: String) {
        self.entries.insert(key.into(), value);
    }

    /// Keys changed since the last call, with their current value
    /// (`None` when the key was removed).
    pub fn take_dirty(&mut self) -> Vec<(String, Option<String>)> {
        std::mem::take(&mut self.dirty)
            .into_iter()
            .map(|key| {
                let value = self.entries.get(&key).cloned();
                (key, value)
            })
            .collect()
    }

    /// Whether any key changed since the last [`Self::take_dirty`].
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        self.dirty.insert(key.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        self.dirty.insert(key.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_absent_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("cart").is_none());
    }

    #[test]
    fn test_preload_is_not_dirty() {
        let mut store = MemoryStore::new();
        store.preload("cart", "[]".to_string());
        assert_eq!(store.get("cart").as_deref(), Some("[]"));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_take_dirty_reports_sets_and_removes() {
        let mut store = MemoryStore::new();
        store.preload("session_user", "ana".to_string());
        store.set("cart", "[1]".to_string()).unwrap();
        store.remove("session_user").unwrap();

        let dirty = store.take_dirty();
        assert_eq!(
            dirty,
            vec![
                ("cart".to_string(), Some("[1]".to_string())),
                ("session_user".to_string(), None),
            ]
        );
        assert!(!store.is_dirty());
        assert!(store.take_dirty().is_empty());
    }
}
