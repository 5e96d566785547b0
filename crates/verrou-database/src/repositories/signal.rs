//! Signal repository implementation.

use sqlx::PgPool;

use verrou_core::result::AppResult;
use verrou_entity::signal::{CreateSignal, Signal};

use crate::error::db_err;

/// Repository for public "item found" reports.
#[derive(Debug, Clone)]
pub struct SignalRepository {
    pool: PgPool,
}

impl SignalRepository {
    /// Create a new signal repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a signal.
    pub async fn create(&self, data: &CreateSignal) -> AppResult<Signal> {
        sqlx::query_as::<_, Signal>(
            "INSERT INTO signals (asset_id, user_id, place, latitude, longitude, date, heure, \
             circonstance, status, asset_images, place_images) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(data.asset_id)
        .bind(data.user_id)
        .bind(&data.place)
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(&data.date)
        .bind(&data.heure)
        .bind(&data.circonstance)
        .bind(data.status)
        .bind(&data.asset_images)
        .bind(&data.place_images)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to create signal"))
    }
}
