//! Storage backend abstraction.

use async_trait::async_trait;
use bytes::Bytes;

use verrou_core::result::AppResult;

/// A place to put uploaded bytes, addressed by relative paths.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug {
    /// Backend name for logs.
    fn provider_type(&self) -> &str;

    /// Write `data` at `path`, creating parent directories.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Write `data` at `path` only if nothing is there yet.
    ///
    /// Returns `false` without touching the existing file when `path` is taken.
    async fn create_new(&self, path: &str, data: Bytes) -> AppResult<bool>;

    /// Remove `path`. Returns `false` when nothing was there.
    async fn delete(&self, path: &str) -> AppResult<bool>;

    /// Whether `path` exists.
    async fn exists(&self, path: &str) -> AppResult<bool>;
}
