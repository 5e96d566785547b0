//! Role entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::name::RoleName;

/// A row of the `roles` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: Uuid,
    /// Machine name used for access checks.
    pub name: RoleName,
    /// Human-readable label.
    pub label: String,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
}
