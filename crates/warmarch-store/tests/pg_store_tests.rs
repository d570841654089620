//! Integration tests for `PgStore`.
//!
//! These need a reachable PostgreSQL instance via `DATABASE_URL`; run them
//! with `cargo test -- --ignored`.

use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;
use warmarch_core::store::KeyValueStore;
use warmarch_store::pg::PgStore;

async fn connect() -> PgStore {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for PgStore tests");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("failed to connect to PostgreSQL");
    let store = PgStore::new(pool);
    store.ensure_schema().await.expect("failed to create schema");
    store
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_put_get_delete_round_trip() {
    let store = connect().await;
    let key = format!("unit:{}", Uuid::new_v4());

    store.put(&key, json!({"name": "Greycloak Shields"})).await.unwrap();
    assert_eq!(
        store.get(&key).await.unwrap(),
        Some(json!({"name": "Greycloak Shields"}))
    );

    store.put(&key, json!({"name": "Red Lancers"})).await.unwrap();
    assert_eq!(
        store.get(&key).await.unwrap(),
        Some(json!({"name": "Red Lancers"}))
    );

    store.delete(&key).await.unwrap();
    assert_eq!(store.get(&key).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_list_by_prefix_returns_matching_keys() {
    let store = connect().await;
    let namespace = Uuid::new_v4();
    let first = format!("battle:{namespace}:a");
    let second = format!("battle:{namespace}:b");
    let other = format!("intrigue:{namespace}");

    for key in [&first, &second, &other] {
        store.put(key, json!(null)).await.unwrap();
    }

    let keys = store
        .list_by_prefix(&format!("battle:{namespace}:"))
        .await
        .unwrap();
    assert_eq!(keys, vec![first.clone(), second.clone()]);

    for key in [&first, &second, &other] {
        store.delete(key).await.unwrap();
    }
}
