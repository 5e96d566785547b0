//! Audit log repository implementation.

use chrono::{DateTime, TimeDelta, Utc};
use sqlx::PgPool;

use verrou_core::error::AppError;
use verrou_core::result::AppResult;
use verrou_core::types::{Filter, Page, PageQuery};
use verrou_entity::log::{CreateLog, Log};

use crate::error::db_err;
use crate::paginate::{ListSpec, paginate};

const LIST: ListSpec = ListSpec {
    from: "logs",
    select: "*",
    search: &["details::text", "ip_address", "user_agent"],
    sortable: &[("created_at", "created_at"), ("action", "action"), ("entity", "entity")],
};

/// Longest accepted retention window, in days.
pub const MAX_RETENTION_DAYS: i64 = 36_500;

/// `now` minus `days`, for `days` in `1..=MAX_RETENTION_DAYS`.
pub fn retention_cutoff(now: DateTime<Utc>, days: i64) -> AppResult<DateTime<Utc>> {
    if !(1..=MAX_RETENTION_DAYS).contains(&days) {
        return Err(AppError::validation(format!(
            "days must be between 1 and {MAX_RETENTION_DAYS}"
        )));
    }
    TimeDelta::try_days(days)
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or_else(|| AppError::validation("days is out of range"))
}

/// Repository for the audit trail.
#[derive(Debug, Clone)]
pub struct LogRepository {
    pool: PgPool,
}

impl LogRepository {
    /// Create a new log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an entry.
    pub async fn create(&self, entry: &CreateLog) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO logs (action, entity, entity_id, user_id, details, ip_address, user_agent) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(entry.action)
        .bind(entry.entity)
        .bind(entry.entity_id)
        .bind(entry.user_id)
        .bind(&entry.details)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to write audit log"))?;
        Ok(())
    }

    /// Paginated listing.
    pub async fn list(&self, filter: &Filter, query: &PageQuery) -> AppResult<Page<Log>> {
        paginate(&self.pool, &LIST, filter, query).await
    }

    /// Delete entries older than `days` days. Returns how many were removed.
    pub async fn delete_older_than(&self, days: i64) -> AppResult<u64> {
        let cutoff = retention_cutoff(Utc::now(), days)?;
        let result = sqlx::query("DELETE FROM logs WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to clean up audit logs"))?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use verrou_core::error::ErrorKind;

    #[test]
    fn cutoff_subtracts_whole_days() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let cutoff = retention_cutoff(now, 90).unwrap();
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2024, 12, 10, 12, 0, 0).unwrap());
    }

    #[test]
    fn cutoff_rejects_out_of_range_windows() {
        let now = Utc::now();
        for days in [0, -3, MAX_RETENTION_DAYS + 1, 9_999_999_999_999, i64::MAX] {
            let err = retention_cutoff(now, days).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation, "days = {days}");
        }
        assert!(retention_cutoff(now, MAX_RETENTION_DAYS).is_ok());
    }
}
