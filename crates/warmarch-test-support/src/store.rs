//! Test stores — mock `KeyValueStore` implementations for tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use warmarch_core::error::EngineError;
use warmarch_core::store::KeyValueStore;

/// A key-value store that behaves like a real in-memory store and records
/// every `put` and `delete` key, so handler tests can assert exactly what was
/// persisted (or that nothing was).
#[derive(Debug, Default)]
pub struct RecordingStore {
    entries: Mutex<BTreeMap<String, Value>>,
    put_keys: Mutex<Vec<String>>,
    deleted_keys: Mutex<Vec<String>>,
}

impl RecordingStore {
    /// Create an empty recording store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recording store preloaded with the given entries.
    #[must_use]
    pub fn seeded(entries: Vec<(String, Value)>) -> Self {
        Self {
            entries: Mutex::new(entries.into_iter().collect()),
            put_keys: Mutex::new(Vec::new()),
            deleted_keys: Mutex::new(Vec::new()),
        }
    }

    /// Keys written via `put`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn put_keys(&self) -> Vec<String> {
        self.put_keys.lock().unwrap().clone()
    }

    /// Keys removed via `delete`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted_keys.lock().unwrap().clone()
    }

    /// The value currently stored under `key`, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<Value> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, EngineError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), EngineError> {
        self.put_keys.lock().unwrap().push(key.to_owned());
        self.entries.lock().unwrap().insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), EngineError> {
        self.deleted_keys.lock().unwrap().push(key.to_owned());
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<String>, EngineError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// A key-value store that always returns a storage error. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>, EngineError> {
        Err(EngineError::Storage("connection refused".into()))
    }

    async fn put(&self, _key: &str, _value: Value) -> Result<(), EngineError> {
        Err(EngineError::Storage("connection refused".into()))
    }

    async fn delete(&self, _key: &str) -> Result<(), EngineError> {
        Err(EngineError::Storage("connection refused".into()))
    }

    async fn list_by_prefix(&self, _prefix: &str) -> Result<Vec<String>, EngineError> {
        Err(EngineError::Storage("connection refused".into()))
    }
}
