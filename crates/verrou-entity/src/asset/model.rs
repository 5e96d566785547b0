//! Asset entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::AssetStatus;

/// A registered physical item.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Asset {
    /// Unique identifier.
    pub id: Uuid,
    /// Free-form description (brand, model, serial number, ...).
    pub data: serde_json::Value,
    /// Relative paths of the photos.
    pub images: Vec<String>,
    /// Relative paths of the purchase invoices (PDF).
    pub invoices: Vec<String>,
    /// Current status.
    pub status: AssetStatus,
    /// Last known latitude.
    pub latitude: Option<f64>,
    /// Last known longitude.
    pub longitude: Option<f64>,
    /// Whether back-office validated the asset.
    pub is_verified: bool,
    /// When the asset was reported found.
    pub retrouve_at: Option<DateTime<Utc>>,
    /// Who reported the asset found.
    pub retrouve_by_id: Option<Uuid>,
    /// Category foreign key.
    pub category_id: Uuid,
    /// Owner foreign key.
    pub user_id: Uuid,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    /// Whether `user_id` owns this asset.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Data required to register an asset.
#[derive(Debug, Clone)]
pub struct CreateAsset {
    /// Free-form description.
    pub data: serde_json::Value,
    /// Uploaded photo paths.
    pub images: Vec<String>,
    /// Uploaded invoice paths.
    pub invoices: Vec<String>,
    /// Category foreign key.
    pub category_id: Uuid,
    /// Owner.
    pub user_id: Uuid,
}

/// An asset joined with its category and owner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssetView {
    /// The asset row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub asset: Asset,
    /// `{id, name, slug, image}` of the category.
    pub category: Option<serde_json::Value>,
    /// `{id, first_name, last_name, pseudo, email, phone, picture}` of the owner.
    pub user: Option<serde_json::Value>,
}

/// Per-status asset totals.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, FromRow)]
pub struct AssetCounts {
    /// Every asset.
    pub total: i64,
    /// Assets in `THEFT` or `LOST`.
    pub total_alerte: i64,
    /// Assets in `RETROUVE`.
    pub total_retrouve: i64,
}
