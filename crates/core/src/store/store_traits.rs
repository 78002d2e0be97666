//! Repository trait for the keyed store.

use async_trait::async_trait;

use crate::errors::Result;

/// Whole-value key/value persistence.
///
/// Reads are synchronous and served from a pool; writes are async so the
/// storage layer can funnel them through a single writer.
#[async_trait]
pub trait KeyValueStoreTrait: Send + Sync {
    /// Get the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Write several keys in one storage transaction.
    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// All keys currently present, sorted.
    fn list_keys(&self) -> Result<Vec<String>>;
}
