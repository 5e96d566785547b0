//! Upload storage configuration.

use serde::{Deserialize, Serialize};

/// Local upload storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory on disk that holds the `uploads/` tree.
    #[serde(default = "default_root")]
    pub root: String,
    /// Maximum size of a single uploaded file in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_root() -> String {
    ".".to_string()
}

fn default_max_upload() -> usize {
    5 * 1024 * 1024
}
