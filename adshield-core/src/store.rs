//! Persistent key-value store interface
//!
//! The host owns persistence. The core only needs a string read/write pair
//! keyed by name; implementations decide where the bytes live.

use crate::Result;
use dashmap::DashMap;
use std::sync::Arc;

/// String key-value store provided by the host
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` when nothing was written yet
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }
}

/// In-process store, shared by clones
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.read("missing").unwrap(), None);

        store.write("k", "v1").unwrap();
        store.write("k", "v2").unwrap();

        assert_eq!(store.read("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let shared: Arc<dyn KeyValueStore> = Arc::new(store.clone());

        shared.write("k", "v").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("v"));
    }
}
