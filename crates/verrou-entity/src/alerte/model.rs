//! Alert entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A report raised by an owner about one of their assets.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alerte {
    /// Unique identifier.
    pub id: Uuid,
    /// Asset concerned.
    pub asset_id: Uuid,
    /// Owner who raised it.
    pub user_id: Uuid,
    /// `vol`, `perte`, `trouve` or free text.
    pub motif: String,
    /// Circumstances, free text.
    pub circonstance: String,
    /// Date of the event as sent by the client.
    pub date: String,
    /// Time of the event as sent by the client.
    pub heure: String,
    /// Where it happened.
    pub place: String,
    /// Police complaint reference.
    pub plaint_number: Option<String>,
    /// Resolved flag (true for `trouve`).
    pub status: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Data required to record an alert.
#[derive(Debug, Clone)]
pub struct CreateAlerte {
    /// Asset concerned.
    pub asset_id: Uuid,
    /// Reporting owner.
    pub user_id: Uuid,
    /// Stored motif text.
    pub motif: String,
    /// Circumstances.
    pub circonstance: String,
    /// Event date.
    pub date: String,
    /// Event time.
    pub heure: String,
    /// Event place.
    pub place: String,
    /// Complaint reference.
    pub plaint_number: Option<String>,
    /// Resolved flag.
    pub status: bool,
}
