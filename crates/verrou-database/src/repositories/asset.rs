//! Asset repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use verrou_core::error::AppError;
use verrou_core::result::AppResult;
use verrou_core::types::{Filter, Page, PageQuery};
use verrou_entity::asset::{Asset, AssetCounts, AssetStatus, AssetView, CreateAsset};

use crate::error::db_err;
use crate::paginate::{ListSpec, paginate};

const VIEW_FROM: &str =
    "assets a LEFT JOIN categories c ON c.id = a.category_id LEFT JOIN users u ON u.id = a.user_id";

const VIEW_SELECT: &str = "a.*, \
    jsonb_build_object('id', c.id, 'name', c.name, 'slug', c.slug, 'image', c.image) AS category, \
    jsonb_build_object('id', u.id, 'first_name', u.first_name, 'last_name', u.last_name, \
        'pseudo', u.pseudo, 'email', u.email, 'phone', u.phone, 'picture', u.picture) AS \"user\"";

const LIST: ListSpec = ListSpec {
    from: VIEW_FROM,
    select: VIEW_SELECT,
    search: &["a.data::text"],
    sortable: &[
        ("created_at", "a.created_at"),
        ("updated_at", "a.updated_at"),
        ("status", "a.status"),
        ("is_verified", "a.is_verified"),
    ],
};

/// Repository for registered assets.
#[derive(Debug, Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    /// Create a new asset repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an asset and consume one unit of the owner's quota.
    ///
    /// Both writes share a transaction; an exhausted quota aborts it
    /// with a `BadRequest`.
    pub async fn create_consuming_quota(&self, data: &CreateAsset) -> AppResult<Asset> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let consumed: Option<Uuid> = sqlx::query_scalar(
            "UPDATE users SET asset_remaining = asset_remaining - 1, updated_at = NOW() \
             WHERE id = $1 AND asset_remaining > 0 RETURNING id",
        )
        .bind(data.user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err("Failed to consume asset quota"))?;

        if consumed.is_none() {
            return Err(AppError::bad_request("Maximum number of assets reached"));
        }

        let asset = sqlx::query_as::<_, Asset>(
            "INSERT INTO assets (data, images, invoices, category_id, user_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&data.data)
        .bind(&data.images)
        .bind(&data.invoices)
        .bind(data.category_id)
        .bind(data.user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to create asset"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit asset creation"))?;
        Ok(asset)
    }

    /// Find an asset by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Asset>> {
        sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find asset"))
    }

    /// Find an asset with its category and owner.
    pub async fn find_view(&self, id: Uuid) -> AppResult<Option<AssetView>> {
        sqlx::query_as::<_, AssetView>(&format!(
            "SELECT {VIEW_SELECT} FROM {VIEW_FROM} WHERE a.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to find asset"))
    }

    /// Paginated listing with category and owner.
    pub async fn list(&self, filter: &Filter, query: &PageQuery) -> AppResult<Page<AssetView>> {
        paginate(&self.pool, &LIST, filter, query).await
    }

    /// Every asset of a user, newest first, optionally restricted to some
    /// statuses and to a search key over the description.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        statuses: Option<&[AssetStatus]>,
        search_key: Option<&str>,
    ) -> AppResult<Vec<AssetView>> {
        let statuses: Option<Vec<String>> =
            statuses.map(|s| s.iter().map(|st| st.as_str().to_string()).collect());
        let pattern = search_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| format!("%{k}%"));

        sqlx::query_as::<_, AssetView>(&format!(
            "SELECT {VIEW_SELECT} FROM {VIEW_FROM} WHERE a.user_id = $1 \
             AND ($2::text[] IS NULL OR a.status::text = ANY($2)) \
             AND ($3::text IS NULL OR a.data::text ILIKE $3) \
             ORDER BY a.created_at DESC"
        ))
        .bind(user_id)
        .bind(statuses)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list user assets"))
    }

    /// Public search over the description, newest first.
    pub async fn search(&self, key: &str) -> AppResult<Vec<AssetView>> {
        sqlx::query_as::<_, AssetView>(&format!(
            "SELECT {VIEW_SELECT} FROM {VIEW_FROM} WHERE a.data::text ILIKE $1 \
             ORDER BY a.created_at DESC LIMIT 50"
        ))
        .bind(format!("%{}%", key.trim()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to search assets"))
    }

    /// Totals by status, optionally for one owner.
    pub async fn counts(&self, user_id: Option<Uuid>) -> AppResult<AssetCounts> {
        sqlx::query_as::<_, AssetCounts>(
            "SELECT COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE status IN ('THEFT', 'LOST')) AS total_alerte, \
                COUNT(*) FILTER (WHERE status = 'RETROUVE') AS total_retrouve \
             FROM assets WHERE ($1::uuid IS NULL OR user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to count assets"))
    }

    /// The newest assets, optionally for one owner.
    pub async fn latest(&self, user_id: Option<Uuid>, limit: i64) -> AppResult<Vec<AssetView>> {
        sqlx::query_as::<_, AssetView>(&format!(
            "SELECT {VIEW_SELECT} FROM {VIEW_FROM} WHERE ($1::uuid IS NULL OR a.user_id = $1) \
             ORDER BY a.created_at DESC LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list latest assets"))
    }

    /// Update the description and category; the asset needs re-verification.
    pub async fn update_details(
        &self,
        id: Uuid,
        data: Option<&serde_json::Value>,
        category_id: Option<Uuid>,
    ) -> AppResult<Asset> {
        sqlx::query_as::<_, Asset>(
            "UPDATE assets SET data = COALESCE($2, data), category_id = COALESCE($3, category_id), \
             is_verified = FALSE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(data)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to update asset"))
    }

    /// Replace the photo list.
    pub async fn set_images(&self, id: Uuid, images: &[String]) -> AppResult<Asset> {
        sqlx::query_as::<_, Asset>(
            "UPDATE assets SET images = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(images)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to update asset images"))
    }

    /// Replace the invoice list.
    pub async fn set_invoices(&self, id: Uuid, invoices: &[String]) -> AppResult<Asset> {
        sqlx::query_as::<_, Asset>(
            "UPDATE assets SET invoices = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(invoices)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to update asset invoices"))
    }

    /// Flip `is_verified`.
    pub async fn toggle_verified(&self, id: Uuid) -> AppResult<Option<Asset>> {
        sqlx::query_as::<_, Asset>(
            "UPDATE assets SET is_verified = NOT is_verified, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to toggle asset verification"))
    }

    /// Delete an asset. Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete asset"))?;
        Ok(result.rows_affected() > 0)
    }
}
