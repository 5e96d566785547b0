//! Local filesystem storage provider.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use verrou_core::error::{AppError, ErrorKind};
use verrou_core::result::AppResult;

use crate::provider::StorageProvider;

/// Stores files below a root directory.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create a provider rooted at `root`, creating the directory.
    pub async fn new(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path under the root.
    ///
    /// Absolute paths and `..` components are rejected.
    pub fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || escapes {
            return Err(AppError::validation(format!("Invalid storage path: {path}")));
        }
        Ok(self.root.join(relative))
    }
}

async fn ensure_parent(full_path: &Path) -> AppResult<()> {
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create directory: {}", parent.display()),
                e,
            )
        })?;
    }
    Ok(())
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to write file: {path}"), e)
        })?;

        debug!(path, bytes = data.len(), "Wrote file");
        Ok(())
    }

    async fn create_new(&self, path: &str, data: Bytes) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        ensure_parent(&full_path).await?;

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!(path, "Path already taken");
                return Ok(false);
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create file: {path}"),
                    e,
                ));
            }
        };

        let written = async {
            file.write_all(&data).await?;
            file.flush().await
        }
        .await;
        if let Err(e) = written {
            let _ = fs::remove_file(&full_path).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write file: {path}"),
                e,
            ));
        }

        debug!(path, bytes = data.len(), "Created file");
        Ok(true)
    }

    async fn delete(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path, "File already gone");
                Ok(false)
            }
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {path}"),
                e,
            )),
        }
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        Ok(fs::try_exists(&full_path).await.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_exists_delete() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path()).await.unwrap();

        provider
            .write("uploads/profile/a.png", Bytes::from_static(b"png"))
            .await
            .unwrap();
        assert!(provider.exists("uploads/profile/a.png").await.unwrap());
        assert!(dir.path().join("uploads/profile/a.png").is_file());

        assert!(provider.delete("uploads/profile/a.png").await.unwrap());
        assert!(!provider.delete("uploads/profile/a.png").await.unwrap());
    }

    #[tokio::test]
    async fn create_new_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path()).await.unwrap();

        assert!(
            provider
                .create_new("uploads/posts/p.png", Bytes::from_static(b"first"))
                .await
                .unwrap()
        );
        assert!(
            !provider
                .create_new("uploads/posts/p.png", Bytes::from_static(b"second"))
                .await
                .unwrap()
        );
        let on_disk = std::fs::read(dir.path().join("uploads/posts/p.png")).unwrap();
        assert_eq!(on_disk, b"first");
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path()).await.unwrap();

        assert!(provider.resolve("uploads/../../etc/passwd").is_err());
        assert!(provider.resolve("").is_err());
        assert!(
            provider
                .write("../outside.txt", Bytes::from_static(b"x"))
                .await
                .is_err()
        );
        let inside = provider.resolve("/uploads/posts/p.png").unwrap();
        assert!(inside.starts_with(dir.path()));
    }
}
