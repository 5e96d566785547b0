//! Audit log recording, browsing and retention.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use verrou_core::error::AppError;
use verrou_core::types::{Filter, FilterValue, Page, PageQuery};
use verrou_database::repositories::{LogRepository, MAX_RETENTION_DAYS};
use verrou_entity::log::{CreateLog, Log, LogAction};

/// Reads and writes the audit trail.
#[derive(Debug, Clone)]
pub struct LogService {
    log_repo: Arc<LogRepository>,
}

impl LogService {
    pub fn new(log_repo: Arc<LogRepository>) -> Self {
        Self { log_repo }
    }

    /// Writes an entry in a background task. Failures are only logged.
    pub fn record(&self, entry: CreateLog) {
        let repo = Arc::clone(&self.log_repo);
        tokio::spawn(async move {
            if let Err(e) = repo.create(&entry).await {
                warn!(
                    action = %entry.action,
                    details = ?entry.details,
                    error = %e,
                    "Failed to write audit log"
                );
            }
        });
    }

    pub async fn list(&self, query: &PageQuery) -> Result<Page<Log>, AppError> {
        self.log_repo.list(&Filter::new(), query).await
    }

    pub async fn list_by_action(
        &self,
        action: LogAction,
        query: &PageQuery,
    ) -> Result<Page<Log>, AppError> {
        let filter = Filter::new().eq(
            "action::text",
            FilterValue::String(action.as_str().to_string()),
        );
        self.log_repo.list(&filter, query).await
    }

    pub async fn list_by_user(&self, user_id: Uuid, query: &PageQuery) -> Result<Page<Log>, AppError> {
        let filter = Filter::new().eq("user_id", FilterValue::Uuid(user_id));
        self.log_repo.list(&filter, query).await
    }

    /// Deletes entries older than `days` days and returns how many went.
    pub async fn cleanup(&self, days: i64) -> Result<u64, AppError> {
        if !(1..=MAX_RETENTION_DAYS).contains(&days) {
            return Err(AppError::validation(format!(
                "days must be between 1 and {MAX_RETENTION_DAYS}"
            )));
        }
        let deleted = self.log_repo.delete_older_than(days).await?;
        info!(days, deleted, "Audit log cleanup completed");
        Ok(deleted)
    }
}
