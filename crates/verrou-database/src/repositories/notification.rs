//! Notification repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use verrou_core::result::AppResult;
use verrou_core::types::filter::FilterValue;
use verrou_core::types::{Filter, Page, PageQuery};
use verrou_entity::notification::{CreateNotification, Notification};

use crate::error::db_err;
use crate::paginate::{ListSpec, paginate};

const LIST: ListSpec = ListSpec {
    from: "notifications",
    select: "*",
    search: &["title", "message"],
    sortable: &[("created_at", "created_at"), ("is_read", "is_read")],
};

/// Repository for in-app notifications.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a notification.
    pub async fn create(&self, data: &CreateNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (user_id, asset_id, title, message) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.asset_id)
        .bind(&data.title)
        .bind(&data.message)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to create notification"))
    }

    /// A user's notifications.
    pub async fn list_for_user(&self, user_id: Uuid, query: &PageQuery) -> AppResult<Page<Notification>> {
        let filter = Filter::new().eq("user_id", FilterValue::Uuid(user_id));
        paginate(&self.pool, &LIST, &filter, query).await
    }

    /// Mark every notification of a user as read. Returns how many changed.
    pub async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to mark notifications read"))?;
        Ok(result.rows_affected())
    }

    /// Mark one notification read if it belongs to `user_id`.
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to mark notification read"))
    }
}
