//! Upload validation, naming and persistence.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use verrou_core::error::{AppError, ErrorKind};
use verrou_core::result::AppResult;

use crate::provider::StorageProvider;

/// Public prefix of every stored path.
pub const UPLOADS_DIR: &str = "uploads";

/// Mime types accepted by default.
pub const DEFAULT_ALLOWED_TYPES: [&str; 6] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
];

const DEFAULT_MAX_SIZE: usize = 5 * 1024 * 1024;

const MAX_NAME_ATTEMPTS: usize = 8;

/// `dir/name_<6 hex>.ext` from `dir/name.ext`.
fn with_random_suffix(path: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    let (stem, ext) = match path.rfind('.') {
        Some(dot) if dot > path.rfind('/').unwrap_or(0) => path.split_at(dot),
        _ => (path, ""),
    };
    format!("{stem}_{}{ext}", &suffix[..6])
}

/// A file received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-side file name.
    pub file_name: Option<String>,
    /// Declared mime type.
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(file_name: Option<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            file_name,
            content_type: content_type.into(),
            data,
        }
    }

    /// Extension including the dot, from the file name or else the mime type.
    pub fn extension(&self) -> String {
        let from_name = self
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

        match from_name {
            Some(ext) => format!(".{ext}"),
            None => extension_for_mime(&self.content_type)
                .map(|ext| format!(".{ext}"))
                .unwrap_or_default(),
        }
    }
}

fn extension_for_mime(mime: &str) -> Option<&'static str> {
    match mime {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "application/pdf" => Some("pdf"),
        _ => None,
    }
}

/// Constraints and destination for one kind of upload.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_size: usize,
    pub allowed_types: Vec<String>,
    /// Sub-directory under `uploads/`.
    pub directory: String,
    /// File name prefix.
    pub prefix: String,
}

impl UploadPolicy {
    /// Images and PDFs up to 5 MiB.
    pub fn new(directory: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            allowed_types: DEFAULT_ALLOWED_TYPES.iter().map(|t| t.to_string()).collect(),
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    /// PDFs only.
    pub fn pdf(directory: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            allowed_types: vec!["application/pdf".to_string()],
            ..Self::new(directory, prefix)
        }
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn profile() -> Self {
        Self::new("profile", "profile")
    }

    pub fn asset_image() -> Self {
        Self::new("assets/images", "asset_image")
    }

    pub fn asset_invoice() -> Self {
        Self::pdf("assets/invoices", "asset_invoice")
    }

    pub fn category() -> Self {
        Self::new("categories", "category")
    }

    pub fn post() -> Self {
        Self::new("posts", "post")
    }

    pub fn signal_asset() -> Self {
        Self::new("signals/assets", "retrouveAssetImage")
    }

    pub fn signal_place() -> Self {
        Self::new("signals/places", "retrouvePlaceImage")
    }

    /// Check type, emptiness and size before anything is written.
    pub fn validate(&self, file: &UploadedFile) -> AppResult<()> {
        if !self.allowed_types.iter().any(|t| *t == file.content_type) {
            return Err(AppError::validation(format!(
                "Unsupported file type '{}'. Accepted types: {}",
                file.content_type,
                self.allowed_types.join(", ")
            )));
        }
        if file.data.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        if file.data.len() > self.max_size {
            return Err(AppError::validation(format!(
                "File is too large. Maximum size is {} MB",
                self.max_size as f64 / (1024.0 * 1024.0)
            )));
        }
        Ok(())
    }

    /// `uploads/<directory>/<prefix>_<unix millis><ext>`.
    pub fn relative_path(&self, file: &UploadedFile, millis: i64) -> String {
        format!(
            "{UPLOADS_DIR}/{}/{}_{}{}",
            self.directory.trim_matches('/'),
            self.prefix,
            millis,
            file.extension()
        )
    }
}

/// Validates and stores uploads through a [`StorageProvider`].
#[derive(Debug, Clone)]
pub struct Uploader {
    provider: Arc<dyn StorageProvider>,
    max_size: usize,
}

impl Uploader {
    /// `max_size` caps every policy.
    pub fn new(provider: Arc<dyn StorageProvider>, max_size: usize) -> Self {
        Self { provider, max_size }
    }

    fn effective(&self, policy: &UploadPolicy) -> UploadPolicy {
        let mut policy = policy.clone();
        policy.max_size = policy.max_size.min(self.max_size);
        policy
    }

    /// Store one file and return its relative path.
    ///
    /// The first attempt uses the plain timestamped name. A taken name gets a
    /// random suffix; the file is only ever created, never overwritten.
    pub async fn store(&self, policy: &UploadPolicy, file: &UploadedFile) -> AppResult<String> {
        let policy = self.effective(policy);
        policy.validate(file)?;

        let base = policy.relative_path(file, Utc::now().timestamp_millis());
        let mut path = base.clone();
        for _ in 0..MAX_NAME_ATTEMPTS {
            if self.provider.create_new(&path, file.data.clone()).await? {
                info!(path = %path, bytes = file.data.len(), "Stored upload");
                return Ok(path);
            }
            path = with_random_suffix(&base);
        }

        Err(AppError::new(
            ErrorKind::Storage,
            format!("Could not find a free name for upload under {}", policy.directory),
        ))
    }

    /// Store several files; validation of every file happens first.
    pub async fn store_all(&self, policy: &UploadPolicy, files: &[UploadedFile]) -> AppResult<Vec<String>> {
        let effective = self.effective(policy);
        for file in files {
            effective.validate(file)?;
        }
        let mut paths = Vec::with_capacity(files.len());
        for file in files {
            paths.push(self.store(policy, file).await?);
        }
        Ok(paths)
    }

    /// Delete a stored file; a missing file is not an error.
    pub async fn delete(&self, relative_path: &str) -> AppResult<()> {
        if !self.provider.delete(relative_path).await? {
            debug!(path = relative_path, "Upload to delete was missing");
        }
        Ok(())
    }

    /// Delete several files, logging failures instead of returning them.
    pub async fn delete_all(&self, paths: &[String]) {
        for path in paths {
            if let Err(e) = self.delete(path).await {
                tracing::warn!(path = %path, error = %e, "Failed to delete upload");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalStorageProvider;
    use std::collections::HashSet;

    fn png(name: &str, len: usize) -> UploadedFile {
        UploadedFile::new(Some(name.to_string()), "image/png", Bytes::from(vec![1u8; len]))
    }

    #[test]
    fn rejects_unsupported_type_listing_accepted_ones() {
        let file = UploadedFile::new(Some("a.png".into()), "image/png", Bytes::from_static(b"x"));
        let err = UploadPolicy::asset_invoice().validate(&file).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("application/pdf"));
    }

    #[test]
    fn rejects_oversize_and_empty_files() {
        let policy = UploadPolicy::profile().with_max_size(1024 * 1024);
        let err = policy.validate(&png("big.png", 1024 * 1024 + 1)).unwrap_err();
        assert!(err.message.contains("1 MB"));
        assert!(policy.validate(&png("empty.png", 0)).is_err());
        assert!(policy.validate(&png("ok.png", 10)).is_ok());
    }

    #[test]
    fn names_follow_prefix_and_timestamp() {
        let path = UploadPolicy::category().relative_path(&png("Photo.PNG", 1), 1_700_000_000_000);
        assert_eq!(path, "uploads/categories/category_1700000000000.png");

        let no_name = UploadedFile::new(None, "application/pdf", Bytes::from_static(b"%PDF"));
        let path = UploadPolicy::asset_invoice().relative_path(&no_name, 5);
        assert_eq!(path, "uploads/assets/invoices/asset_invoice_5.pdf");
    }

    #[tokio::test]
    async fn same_millisecond_uploads_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(LocalStorageProvider::new(dir.path()).await.unwrap());
        let uploader = Uploader::new(provider, 5 * 1024 * 1024);

        let files = vec![png("a.png", 3), png("b.png", 3), png("c.png", 3)];
        let paths = uploader.store_all(&UploadPolicy::asset_image(), &files).await.unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths[0] != paths[1] && paths[1] != paths[2] && paths[0] != paths[2]);
        for path in &paths {
            assert!(path.starts_with("uploads/assets/images/asset_image_"));
            assert!(path.ends_with(".png"));
            assert!(dir.path().join(path).is_file());
        }

        uploader.delete(&paths[0]).await.unwrap();
        uploader.delete(&paths[0]).await.unwrap();
        assert!(!dir.path().join(&paths[0]).exists());
    }

    #[tokio::test]
    async fn global_limit_caps_policy() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(LocalStorageProvider::new(dir.path()).await.unwrap());
        let uploader = Uploader::new(provider, 4);
        let err = uploader.store(&UploadPolicy::post(), &png("p.png", 5)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_uploads_never_share_a_path() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(LocalStorageProvider::new(dir.path()).await.unwrap());
        let uploader = Uploader::new(provider, 5 * 1024 * 1024);

        for round in 0..20u8 {
            let handles: Vec<_> = (0..8u8)
                .map(|i| {
                    let uploader = uploader.clone();
                    let file = UploadedFile::new(
                        Some("p.png".into()),
                        "image/png",
                        Bytes::from(vec![round, i]),
                    );
                    tokio::spawn(async move { uploader.store(&UploadPolicy::post(), &file).await })
                })
                .collect();

            let mut paths = HashSet::new();
            for (i, handle) in handles.into_iter().enumerate() {
                let path = handle.await.unwrap().unwrap();
                let on_disk = std::fs::read(dir.path().join(&path)).unwrap();
                assert_eq!(on_disk, vec![round, i as u8], "{path} holds another upload");
                assert!(paths.insert(path));
            }
        }
    }

    #[test]
    fn random_suffix_keeps_directory_and_extension() {
        let path = with_random_suffix("uploads/posts/post_1.png");
        assert!(path.starts_with("uploads/posts/post_1_"));
        assert!(path.ends_with(".png"));
        assert_eq!(path.len(), "uploads/posts/post_1_abcdef.png".len());

        let bare = with_random_suffix("uploads/posts/post_1");
        assert!(bare.starts_with("uploads/posts/post_1_"));
    }
}
