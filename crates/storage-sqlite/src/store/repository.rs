use async_trait::async_trait;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use super::model::AppStoreEntryDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::app_store::dsl::*;
use fundpilot_core::errors::Result;
use fundpilot_core::store::KeyValueStoreTrait;

/// Keyed store backed by the `app_store` table.
pub struct SqliteStore {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SqliteStore {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SqliteStore { pool, writer }
    }
}

#[async_trait]
impl KeyValueStoreTrait for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        let value = app_store
            .filter(store_key.eq(key))
            .select(store_value)
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let row = AppStoreEntryDB::new(key, value);
        self.writer
            .exec(move |conn| {
                diesel::replace_into(app_store)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<()> {
        let rows: Vec<AppStoreEntryDB> = entries
            .iter()
            .map(|(k, v)| AppStoreEntryDB::new(k, v))
            .collect();
        debug!("Writing {} store entries in one transaction", rows.len());
        self.writer
            .exec(move |conn| {
                for row in &rows {
                    diesel::replace_into(app_store)
                        .values(row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(())
            })
            .await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(app_store.filter(store_key.eq(key)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        let keys = app_store
            .select(store_key)
            .order(store_key.asc())
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(keys)
    }
}
