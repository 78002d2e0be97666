use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::KeyValueStoreTrait;
use crate::errors::{DatabaseError, Result};

/// Process-local keyed store.
///
/// Backs tests and ephemeral runs; nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with raw values.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            entries: RwLock::new(map),
        }
    }

    fn poisoned() -> DatabaseError {
        DatabaseError::Internal("in-memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl KeyValueStoreTrait for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_many(&self, new_entries: Vec<(String, String)>) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.extend(new_entries);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.remove(key);
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries.keys().cloned().collect())
    }
}
