//! In-app notification entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A notification shown in the user's inbox.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique identifier.
    pub id: Uuid,
    /// Recipient.
    pub user_id: Uuid,
    /// Asset the notification is about, if any.
    pub asset_id: Option<Uuid>,
    /// Short title.
    pub title: String,
    /// Body.
    pub message: String,
    /// Read flag.
    pub is_read: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: Uuid,
    pub asset_id: Option<Uuid>,
    pub title: String,
    pub message: String,
}
