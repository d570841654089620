//! In-memory key-value store.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use warmarch_core::error::EngineError;
use warmarch_core::store::KeyValueStore;

/// An in-memory store for development and tests. Keys are held in a sorted
/// map, so `list_by_prefix` returns keys in lexicographic order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the store holds no entries.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, EngineError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), EngineError> {
        self.entries.lock().unwrap().insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), EngineError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<String>, EngineError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .range(prefix.to_owned()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_put_get_delete_round_trip() {
        let store = MemoryStore::new();
        store.put("unit:1", json!({"name": "a"})).await.unwrap();

        assert_eq!(store.get("unit:1").await.unwrap(), Some(json!({"name": "a"})));
        assert_eq!(store.get("unit:2").await.unwrap(), None);

        store.delete("unit:1").await.unwrap();
        assert_eq!(store.get("unit:1").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_put_replaces_existing_value() {
        let store = MemoryStore::new();
        store.put("domain:1", json!(1)).await.unwrap();
        store.put("domain:1", json!(2)).await.unwrap();
        assert_eq!(store.get("domain:1").await.unwrap(), Some(json!(2)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_list_by_prefix_filters_and_sorts() {
        let store = MemoryStore::new();
        for key in ["unit:b", "domain:x", "unit:a", "index:unit"] {
            store.put(key, json!(null)).await.unwrap();
        }

        let keys = store.list_by_prefix("unit:").await.unwrap();
        assert_eq!(keys, vec!["unit:a".to_owned(), "unit:b".to_owned()]);
    }
}
