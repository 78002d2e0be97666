use async_trait::async_trait;

use crate::errors::Result;

/// Remote blob storage for whole-store snapshots.
#[async_trait]
pub trait BackupTransportTrait: Send + Sync {
    async fn upload(&self, name: &str, payload: Vec<u8>) -> Result<()>;

    async fn download(&self, name: &str) -> Result<Vec<u8>>;

    /// Snapshot names available remotely.
    async fn list(&self) -> Result<Vec<String>>;

    async fn delete(&self, name: &str) -> Result<()>;
}
