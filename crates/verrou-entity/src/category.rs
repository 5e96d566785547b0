//! Category entity, shared by assets and blog posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A category of assets and posts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name, unique.
    pub name: String,
    /// URL slug derived from the name.
    pub slug: String,
    /// Relative path of the category image.
    pub image: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Category with the number of assets filed under it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategoryAssetCount {
    /// Category identifier.
    pub id: Uuid,
    /// Category name.
    pub name: String,
    /// Number of assets.
    pub asset_count: i64,
}
