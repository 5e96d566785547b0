//! # verrou-storage
//!
//! Uploaded files live on the local filesystem under `uploads/`. The
//! [`Uploader`] validates each file against an [`UploadPolicy`], names
//! it and hands the bytes to a [`StorageProvider`].

pub mod local;
pub mod provider;
pub mod upload;

pub use local::LocalStorageProvider;
pub use provider::StorageProvider;
pub use upload::{UploadPolicy, UploadedFile, Uploader};
