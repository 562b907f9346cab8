use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Blob store for drive file contents
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Upload data to storage
    async fn put(&self, key: &str, data: Bytes) -> Result<()>;

    /// Remove a blob. Removing a missing blob succeeds.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a blob exists
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Get the storage type name
    fn storage_type(&self) -> &'static str;
}
