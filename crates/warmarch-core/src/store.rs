//! Key-value store abstraction and entity keyspace.
//!
//! The engine persists entities as JSON values under namespaced keys
//! (`unit:<id>`, `battle:<id>`, …) and maintains one id-index list per kind
//! (`index:unit`, …) so entities can be enumerated without a table scan.
//! The record helpers here are the single write path: an entity's presence
//! in storage and its presence in the kind's index list stay consistent.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::EngineError;

/// Abstract key-value store implemented by the persistence layer.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Value>, EngineError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: Value) -> Result<(), EngineError>;

    /// Removes the value stored under `key`. Missing keys are not an error.
    async fn delete(&self, key: &str) -> Result<(), EngineError>;

    /// Returns every key starting with `prefix`.
    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<String>, EngineError>;
}

/// The kinds of entity the engine persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A military unit.
    Unit,
    /// A political domain.
    Domain,
    /// A warfare battle.
    Battle,
    /// An intrigue session.
    Intrigue,
}

impl EntityKind {
    /// The key namespace for records of this kind.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Unit => "unit:",
            Self::Domain => "domain:",
            Self::Battle => "battle:",
            Self::Intrigue => "intrigue:",
        }
    }

    /// The key under which the id-index list for this kind is stored.
    #[must_use]
    pub const fn index_key(self) -> &'static str {
        match self {
            Self::Unit => "index:unit",
            Self::Domain => "index:domain",
            Self::Battle => "index:battle",
            Self::Intrigue => "index:intrigue",
        }
    }

    /// The storage key for one record of this kind.
    #[must_use]
    pub fn record_key(self, id: Uuid) -> String {
        format!("{}{id}", self.prefix())
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unit => "unit",
            Self::Domain => "domain",
            Self::Battle => "battle",
            Self::Intrigue => "intrigue",
        };
        f.write_str(name)
    }
}

/// A persistable entity bound to its kind and identifier.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// The keyspace this entity lives in.
    const KIND: EntityKind;

    /// Returns the entity identifier.
    fn entity_id(&self) -> Uuid;
}

/// Reads the id-index list for `kind`. A missing index reads as empty.
///
/// # Errors
///
/// Returns `EngineError::Storage` on store failure or
/// `EngineError::Serialization` if the stored index is not an id list.
pub async fn list_ids(
    store: &dyn KeyValueStore,
    kind: EntityKind,
) -> Result<Vec<Uuid>, EngineError> {
    match store.get(kind.index_key()).await? {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| EngineError::Serialization(format!("{kind} index: {e}"))),
        None => Ok(Vec::new()),
    }
}

async fn write_index(
    store: &dyn KeyValueStore,
    kind: EntityKind,
    ids: &[Uuid],
) -> Result<(), EngineError> {
    let value =
        serde_json::to_value(ids).map_err(|e| EngineError::Serialization(e.to_string()))?;
    store.put(kind.index_key(), value).await
}

/// Persists an entity and ensures its id is present (once, in insertion
/// order) in the kind's index list.
///
/// # Errors
///
/// Returns `EngineError::Serialization` if the entity cannot be serialized,
/// or `EngineError::Storage` on store failure.
pub async fn save_record<T: Entity>(
    store: &dyn KeyValueStore,
    entity: &T,
) -> Result<(), EngineError> {
    let id = entity.entity_id();
    let value =
        serde_json::to_value(entity).map_err(|e| EngineError::Serialization(e.to_string()))?;
    store.put(&T::KIND.record_key(id), value).await?;

    let mut ids = list_ids(store, T::KIND).await?;
    if !ids.contains(&id) {
        ids.push(id);
        write_index(store, T::KIND, &ids).await?;
    }
    Ok(())
}

/// Loads an entity by id, returning `None` if it is not stored.
///
/// # Errors
///
/// Returns `EngineError::Serialization` if the stored value does not
/// deserialize as `T`, or `EngineError::Storage` on store failure.
pub async fn load_record<T: Entity>(
    store: &dyn KeyValueStore,
    id: Uuid,
) -> Result<Option<T>, EngineError> {
    match store.get(&T::KIND.record_key(id)).await? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| EngineError::Serialization(format!("{} {id}: {e}", T::KIND))),
        None => Ok(None),
    }
}

/// Loads an entity by id, failing if it is not stored.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if no record exists, otherwise as
/// [`load_record`].
pub async fn require_record<T: Entity>(
    store: &dyn KeyValueStore,
    id: Uuid,
) -> Result<T, EngineError> {
    load_record(store, id)
        .await?
        .ok_or(EngineError::EntityNotFound { kind: T::KIND, id })
}

/// Deletes an entity record and removes its id from the kind's index list.
///
/// # Errors
///
/// Returns `EngineError::Storage` on store failure.
pub async fn delete_record(
    store: &dyn KeyValueStore,
    kind: EntityKind,
    id: Uuid,
) -> Result<(), EngineError> {
    store.delete(&kind.record_key(id)).await?;

    let ids = list_ids(store, kind).await?;
    if ids.contains(&id) {
        let remaining: Vec<Uuid> = ids.into_iter().filter(|other| *other != id).collect();
        write_index(store, kind, &remaining).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;

    /// Minimal in-memory store for exercising the record helpers.
    #[derive(Default)]
    struct MapStore {
        entries: Mutex<BTreeMap<String, Value>>,
    }

    #[async_trait]
    impl KeyValueStore for MapStore {
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
                .keys()
                .filter(|key| key.starts_with(prefix))
                .cloned()
                .collect())
        }
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Banner {
        id: Uuid,
        name: String,
    }

    impl Entity for Banner {
        const KIND: EntityKind = EntityKind::Unit;

        fn entity_id(&self) -> Uuid {
            self.id
        }
    }

    #[test]
    fn test_record_key_is_prefixed() {
        let id = Uuid::new_v4();
        assert_eq!(EntityKind::Battle.record_key(id), format!("battle:{id}"));
        assert_eq!(EntityKind::Intrigue.index_key(), "index:intrigue");
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let store = MapStore::default();
        let banner = Banner {
            id: Uuid::new_v4(),
            name: "Iron Halberds".to_owned(),
        };

        save_record(&store, &banner).await.unwrap();

        let loaded: Banner = require_record(&store, banner.id).await.unwrap();
        assert_eq!(loaded, banner);
    }

    #[tokio::test]
    async fn test_save_maintains_unique_insertion_ordered_index() {
        let store = MapStore::default();
        let first = Banner {
            id: Uuid::new_v4(),
            name: "First".to_owned(),
        };
        let second = Banner {
            id: Uuid::new_v4(),
            name: "Second".to_owned(),
        };

        save_record(&store, &first).await.unwrap();
        save_record(&store, &second).await.unwrap();
        // Re-saving must not duplicate the index entry.
        save_record(&store, &first).await.unwrap();

        let ids = list_ids(&store, EntityKind::Unit).await.unwrap();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_index_entry() {
        let store = MapStore::default();
        let banner = Banner {
            id: Uuid::new_v4(),
            name: "Doomed".to_owned(),
        };
        save_record(&store, &banner).await.unwrap();

        delete_record(&store, EntityKind::Unit, banner.id)
            .await
            .unwrap();

        assert!(
            load_record::<Banner>(&store, banner.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(list_ids(&store, EntityKind::Unit).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_require_record_reports_not_found() {
        let store = MapStore::default();
        let id = Uuid::new_v4();

        let err = require_record::<Banner>(&store, id).await.unwrap_err();
        match err {
            EngineError::EntityNotFound { kind, id: missing } => {
                assert_eq!(kind, EntityKind::Unit);
                assert_eq!(missing, id);
            }
            other => panic!("expected EntityNotFound, got {other:?}"),
        }
    }
}
