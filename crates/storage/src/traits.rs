//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// Object store abstraction over S3-compatible and filesystem backends.
///
/// This is the single seam the HTTP handlers talk to. Absence is always a
/// value (`exists` -> `Ok(false)`, `head`/`get` -> `Err(NotFound)`); transport
/// and credential failures are other error variants, so callers can tell
/// "confirmed absent" apart from "probe failed".
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Check if an object exists. `Ok(false)` means the backend confirmed
    /// the key is absent; transport failures are `Err`.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get an object's metadata without fetching content.
    async fn head(&self, key: &str) -> StorageResult<ObjectMeta>;

    /// Get an object's content.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Put an object, replacing any existing content (last-write-wins).
    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> StorageResult<()>;

    /// Delete an object. Not reachable from the HTTP surface; kept for
    /// operational tooling and tests.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Produce a time-limited signed PUT URL scoped to exactly this key.
    ///
    /// Backends without a signing scheme return `StorageError::Unsupported`.
    async fn presign_put(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Get the name of this storage backend ("s3", "filesystem").
    /// Used for logging and error messages.
    fn backend_name(&self) -> &'static str;

    /// Verify backend connectivity. Called during startup so the server
    /// fails fast instead of reporting healthy with unreachable storage.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}

/// Metadata about a stored object.
#[derive(Clone, Debug)]
pub struct ObjectMeta {
    /// Object size in bytes.
    pub size: u64,
    /// Last modification time (if available).
    pub last_modified: Option<time::OffsetDateTime>,
    /// Content type (if available).
    pub content_type: Option<String>,
}
