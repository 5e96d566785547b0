//! Alerte repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use verrou_core::result::AppResult;
use verrou_core::types::{Filter, Page, PageQuery};
use verrou_entity::alerte::{Alerte, CreateAlerte};
use verrou_entity::asset::AssetStatus;

use crate::error::db_err;
use crate::paginate::{ListSpec, paginate};

const LIST: ListSpec = ListSpec {
    from: "alertes",
    select: "*",
    search: &["motif", "place", "plaint_number"],
    sortable: &[("created_at", "created_at"), ("motif", "motif"), ("status", "status")],
};

/// Repository for alerts raised by asset owners.
#[derive(Debug, Clone)]
pub struct AlerteRepository {
    pool: PgPool,
}

impl AlerteRepository {
    /// Create a new alerte repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an alerte and move its asset to `status` in one transaction.
    pub async fn create_with_status(
        &self,
        data: &CreateAlerte,
        status: AssetStatus,
    ) -> AppResult<Alerte> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let alerte = sqlx::query_as::<_, Alerte>(
            "INSERT INTO alertes (asset_id, user_id, motif, circonstance, date, heure, place, \
             plaint_number, status) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(data.asset_id)
        .bind(data.user_id)
        .bind(&data.motif)
        .bind(&data.circonstance)
        .bind(&data.date)
        .bind(&data.heure)
        .bind(&data.place)
        .bind(&data.plaint_number)
        .bind(data.status)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to create alerte"))?;

        sqlx::query(
            "UPDATE assets SET status = $2, \
             retrouve_at = CASE WHEN $3 THEN NOW() ELSE retrouve_at END, \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(data.asset_id)
        .bind(status)
        .bind(status == AssetStatus::Retrouve)
        .execute(&mut *tx)
        .await
        .map_err(db_err("Failed to update asset status"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit alerte"))?;
        Ok(alerte)
    }

    /// Find an alerte by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Alerte>> {
        sqlx::query_as::<_, Alerte>("SELECT * FROM alertes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find alerte"))
    }

    /// Alertes of one asset, newest first.
    pub async fn find_by_asset(&self, asset_id: Uuid) -> AppResult<Vec<Alerte>> {
        sqlx::query_as::<_, Alerte>(
            "SELECT * FROM alertes WHERE asset_id = $1 ORDER BY created_at DESC",
        )
        .bind(asset_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list asset alertes"))
    }

    /// Paginated listing.
    pub async fn list(&self, query: &PageQuery) -> AppResult<Page<Alerte>> {
        paginate(&self.pool, &LIST, &Filter::new(), query).await
    }

    /// Delete an alerte. Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM alertes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete alerte"))?;
        Ok(result.rows_affected() > 0)
    }
}
