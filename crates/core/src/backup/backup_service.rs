use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::backup::{
    backup_name_for, BackupSnapshot, BackupTransportTrait, RestoreSummary, BACKUP_FORMAT_VERSION,
};
use crate::constants::store_keys;
use crate::errors::{Error, PersistenceError, Result, ValidationError};
use crate::market_data::PriceHistory;
use crate::preferences::StrategyPreferences;
use crate::store::KeyValueStoreTrait;
use crate::transactions::Transaction;

#[async_trait]
pub trait BackupServiceTrait: Send + Sync {
    /// Snapshot of every store entry.
    fn export_snapshot(&self, now: DateTime<Utc>) -> Result<BackupSnapshot>;

    /// Validates every entry, then writes them all in one store transaction.
    async fn import_snapshot(&self, snapshot: BackupSnapshot) -> Result<RestoreSummary>;

    /// Exports and uploads a snapshot named after `now`'s date.
    async fn push(&self, now: DateTime<Utc>) -> Result<String>;

    /// Downloads and imports a named snapshot.
    async fn pull(&self, name: &str) -> Result<RestoreSummary>;

    async fn list_remote(&self) -> Result<Vec<String>>;

    async fn delete_remote(&self, name: &str) -> Result<()>;
}

pub struct BackupService {
    store: Arc<dyn KeyValueStoreTrait>,
    transport: Option<Arc<dyn BackupTransportTrait>>,
}

impl BackupService {
    pub fn new(store: Arc<dyn KeyValueStoreTrait>) -> Self {
        Self {
            store,
            transport: None,
        }
    }

    pub fn with_transport(mut self, transport: Arc<dyn BackupTransportTrait>) -> Self {
        self.transport = Some(transport);
        self
    }

    fn transport(&self) -> Result<&Arc<dyn BackupTransportTrait>> {
        self.transport
            .as_ref()
            .ok_or_else(|| Error::Unexpected("No backup transport configured".to_string()))
    }

    fn check_shape<T: DeserializeOwned>(key: &str, value: &Value) -> Result<()> {
        serde_json::from_value::<T>(value.clone())
            .map(|_| ())
            .map_err(|e| {
                PersistenceError::Malformed {
                    key: key.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
    }

    /// Known keys must decode into their domain type; other keys only need to be JSON.
    fn validate_entry(key: &str, value: &Value) -> Result<()> {
        match key {
            store_keys::TRANSACTIONS => Self::check_shape::<Vec<Transaction>>(key, value),
            store_keys::PRICE_HISTORY => Self::check_shape::<PriceHistory>(key, value),
            store_keys::PREFERENCES => Self::check_shape::<StrategyPreferences>(key, value),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl BackupServiceTrait for BackupService {
    fn export_snapshot(&self, now: DateTime<Utc>) -> Result<BackupSnapshot> {
        let mut entries = BTreeMap::new();
        for key in self.store.list_keys()? {
            let Some(raw) = self.store.get(&key)? else {
                continue;
            };
            let value: Value = serde_json::from_str(&raw).map_err(|e| PersistenceError::Malformed {
                key: key.clone(),
                reason: e.to_string(),
            })?;
            entries.insert(key, value);
        }

        Ok(BackupSnapshot {
            format_version: BACKUP_FORMAT_VERSION,
            created_at: now,
            entries,
        })
    }

    async fn import_snapshot(&self, snapshot: BackupSnapshot) -> Result<RestoreSummary> {
        if snapshot.format_version > BACKUP_FORMAT_VERSION {
            return Err(ValidationError::InvalidInput(format!(
                "Unsupported backup format version {}",
                snapshot.format_version
            ))
            .into());
        }

        for (key, value) in &snapshot.entries {
            if let Err(e) = Self::validate_entry(key, value) {
                warn!("Rejecting backup: {}", e);
                return Err(e);
            }
        }

        let mut writes = Vec::with_capacity(snapshot.entries.len());
        for (key, value) in &snapshot.entries {
            let raw = serde_json::to_string(value).map_err(|e| PersistenceError::Encoding {
                key: key.clone(),
                reason: e.to_string(),
            })?;
            writes.push((key.clone(), raw));
        }

        let restored_keys: Vec<String> = writes.iter().map(|(k, _)| k.clone()).collect();
        self.store.set_many(writes).await?;
        info!("Restored {} key(s) from backup", restored_keys.len());
        Ok(RestoreSummary { restored_keys })
    }

    async fn push(&self, now: DateTime<Utc>) -> Result<String> {
        let transport = self.transport()?;
        let snapshot = self.export_snapshot(now)?;
        let payload = serde_json::to_vec(&snapshot).map_err(|e| PersistenceError::Encoding {
            key: "backup".to_string(),
            reason: e.to_string(),
        })?;

        let name = backup_name_for(now.date_naive());
        transport.upload(&name, payload).await?;
        info!("Uploaded backup {}", name);
        Ok(name)
    }

    async fn pull(&self, name: &str) -> Result<RestoreSummary> {
        let payload = self.transport()?.download(name).await?;
        let snapshot: BackupSnapshot =
            serde_json::from_slice(&payload).map_err(|e| PersistenceError::Malformed {
                key: name.to_string(),
                reason: e.to_string(),
            })?;
        self.import_snapshot(snapshot).await
    }

    async fn list_remote(&self) -> Result<Vec<String>> {
        let mut names = self.transport()?.list().await?;
        names.sort();
        Ok(names)
    }

    async fn delete_remote(&self, name: &str) -> Result<()> {
        self.transport()?.delete(name).await
    }
}
