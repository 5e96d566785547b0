//! Scheduled job configuration.

use serde::{Deserialize, Serialize};

/// Background scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether scheduled jobs run inside the server process.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Audit log entries older than this are pruned.
    #[serde(default = "default_retention")]
    pub log_retention_days: i64,
    /// Six-field cron expression for the log cleanup job.
    #[serde(default = "default_cleanup_cron")]
    pub log_cleanup_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_retention_days: default_retention(),
            log_cleanup_cron: default_cleanup_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_retention() -> i64 {
    90
}

fn default_cleanup_cron() -> String {
    "0 30 3 * * *".to_string()
}
