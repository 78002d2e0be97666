use diesel::prelude::*;
use tempfile::TempDir;

use super::model::AppStoreEntryDB;
use super::SqliteStore;
use crate::db::{create_pool, init, run_migrations, spawn_writer, WriteHandle};
use crate::errors::StorageError;
use crate::schema::app_store;
use fundpilot_core::errors::{Error, ValidationError};
use fundpilot_core::store::KeyValueStoreTrait;

fn setup() -> (TempDir, SqliteStore, WriteHandle) {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let db_path = init(data_dir.to_str().unwrap()).unwrap();
    let pool = create_pool(&db_path).unwrap();
    run_migrations(&pool).unwrap();
    let writer = spawn_writer((*pool).clone());
    (dir, SqliteStore::new(pool, writer.clone()), writer)
}

#[tokio::test]
async fn test_set_get_overwrite() {
    let (_dir, store, _) = setup();

    assert_eq!(store.get("fund_transactions").unwrap(), None);
    store.set("fund_transactions", "[]").await.unwrap();
    assert_eq!(store.get("fund_transactions").unwrap().as_deref(), Some("[]"));

    store
        .set("fund_transactions", r#"[{"id":"a"}]"#)
        .await
        .unwrap();
    assert_eq!(
        store.get("fund_transactions").unwrap().as_deref(),
        Some(r#"[{"id":"a"}]"#)
    );
}

#[tokio::test]
async fn test_set_many_and_list_keys() {
    let (_dir, store, _) = setup();

    store
        .set_many(vec![
            ("strategy_preferences".to_string(), "{}".to_string()),
            ("fund_nav_cache".to_string(), "{}".to_string()),
        ])
        .await
        .unwrap();

    assert_eq!(
        store.list_keys().unwrap(),
        vec!["fund_nav_cache".to_string(), "strategy_preferences".to_string()]
    );

    store.delete("fund_nav_cache").await.unwrap();
    store.delete("fund_nav_cache").await.unwrap();
    assert_eq!(store.list_keys().unwrap(), vec!["strategy_preferences".to_string()]);
}

#[tokio::test]
async fn test_failed_job_rolls_back() {
    let (_dir, store, writer) = setup();

    let result: fundpilot_core::Result<()> = writer
        .exec(|conn| {
            diesel::replace_into(app_store::table)
                .values(&AppStoreEntryDB::new("half", "written"))
                .execute(conn)
                .map_err(StorageError::from)?;
            Err(ValidationError::InvalidInput("abort".to_string()).into())
        })
        .await;

    assert!(matches!(result, Err(Error::Database(_))));
    assert_eq!(store.get("half").unwrap(), None);
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = init(dir.path().to_str().unwrap()).unwrap();
    let pool = create_pool(&db_path).unwrap();
    run_migrations(&pool).unwrap();
    run_migrations(&pool).unwrap();
    let store = SqliteStore::new(pool.clone(), spawn_writer((*pool).clone()));
    assert!(store.list_keys().unwrap().is_empty());
}

