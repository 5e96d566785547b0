//! Audit log retention.

use std::sync::Arc;

use verrou_core::error::AppError;
use verrou_service::LogService;

/// Deletes audit entries older than the retention period.
#[derive(Debug, Clone)]
pub struct LogCleanupJob {
    /// Audit log service
    log_service: Arc<LogService>,
    /// Entries older than this many days are removed
    retention_days: i64,
}

impl LogCleanupJob {
    /// Create a new cleanup job
    pub fn new(log_service: Arc<LogService>, retention_days: i64) -> Self {
        Self {
            log_service,
            retention_days,
        }
    }

    /// Retention period in days
    pub fn retention_days(&self) -> i64 {
        self.retention_days
    }

    /// Run one cleanup pass and return the number of deleted entries
    pub async fn run(&self) -> Result<u64, AppError> {
        tracing::info!(retention_days = self.retention_days, "Running audit log cleanup");
        let deleted = self.log_service.cleanup(self.retention_days).await?;
        tracing::info!("Removed {} audit log entries", deleted);
        Ok(deleted)
    }
}
