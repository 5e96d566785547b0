//! Signal entity: a third party reports having found someone's asset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A "found it" report filed against an asset.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Signal {
    /// Unique identifier.
    pub id: Uuid,
    /// Asset reported.
    pub asset_id: Uuid,
    /// Reporter.
    pub user_id: Uuid,
    /// Where the asset was seen.
    pub place: String,
    /// Latitude of the sighting.
    pub latitude: Option<f64>,
    /// Longitude of the sighting.
    pub longitude: Option<f64>,
    /// Date of the sighting.
    pub date: String,
    /// Time of the sighting.
    pub heure: String,
    /// Circumstances.
    pub circonstance: Option<String>,
    /// Handled flag.
    pub status: bool,
    /// Photos of the asset.
    pub asset_images: Vec<String>,
    /// Photos of the place.
    pub place_images: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Data required to file a signal.
#[derive(Debug, Clone)]
pub struct CreateSignal {
    pub asset_id: Uuid,
    pub user_id: Uuid,
    pub place: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date: String,
    pub heure: String,
    pub circonstance: Option<String>,
    pub status: bool,
    pub asset_images: Vec<String>,
    pub place_images: Vec<String>,
}
