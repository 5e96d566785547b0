//! Aggregate queries behind the dashboards.

use sqlx::PgPool;

use verrou_core::result::AppResult;
use verrou_entity::category::CategoryAssetCount;
use verrou_entity::stats::{
    AssetStats, DonationStats, NotificationStats, ResolutionStats, StatusCount,
    SubscriptionStats, UserStats,
};

use crate::error::db_err;

/// Read-only statistics over several tables.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    /// Create a new stats repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn users(&self) -> AppResult<UserStats> {
        sqlx::query_as::<_, UserStats>(
            "SELECT COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE is_active) AS active, \
                COUNT(*) FILTER (WHERE is_verified) AS verified, \
                COUNT(*) FILTER (WHERE created_at >= date_trunc('month', NOW())) AS new_this_month \
             FROM users",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to compute user stats"))
    }

    pub async fn donations(&self) -> AppResult<DonationStats> {
        sqlx::query_as::<_, DonationStats>(
            "SELECT COALESCE(SUM(amount), 0)::DOUBLE PRECISION AS total_amount, \
                COUNT(*) AS count, \
                COUNT(*) FILTER (WHERE status) AS validated, \
                COALESCE(ROUND(AVG(amount)::NUMERIC, 2), 0)::DOUBLE PRECISION AS average \
             FROM donations",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to compute donation stats"))
    }

    pub async fn subscriptions(&self) -> AppResult<SubscriptionStats> {
        sqlx::query_as::<_, SubscriptionStats>(
            "SELECT COUNT(*) AS count, COALESCE(SUM(s.price), 0)::DOUBLE PRECISION AS revenue \
             FROM user_subscriptions us JOIN subscriptions s ON s.id = us.subscription_id",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to compute subscription stats"))
    }

    pub async fn assets(&self) -> AppResult<AssetStats> {
        let by_status = sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM assets GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to count assets by status"))?;

        let (verified, new_this_month, new_this_week) = sqlx::query_as::<_, (i64, i64, i64)>(
            "SELECT COUNT(*) FILTER (WHERE is_verified), \
                COUNT(*) FILTER (WHERE created_at >= date_trunc('month', NOW())), \
                COUNT(*) FILTER (WHERE created_at >= date_trunc('week', NOW())) \
             FROM assets",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to compute asset stats"))?;

        Ok(AssetStats {
            by_status,
            verified,
            new_this_month,
            new_this_week,
        })
    }

    pub async fn alertes(&self) -> AppResult<ResolutionStats> {
        self.resolution("alertes").await
    }

    pub async fn signals(&self) -> AppResult<ResolutionStats> {
        self.resolution("signals").await
    }

    async fn resolution(&self, table: &'static str) -> AppResult<ResolutionStats> {
        sqlx::query_as::<_, ResolutionStats>(&format!(
            "SELECT COUNT(*) AS total, COUNT(*) FILTER (WHERE status) AS resolved, \
             COUNT(*) FILTER (WHERE NOT status) AS unresolved FROM {table}"
        ))
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to compute resolution stats"))
    }

    pub async fn notifications(&self) -> AppResult<NotificationStats> {
        sqlx::query_as::<_, NotificationStats>(
            "SELECT COUNT(*) AS total, COUNT(*) FILTER (WHERE NOT is_read) AS unread \
             FROM notifications",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to compute notification stats"))
    }

    /// Categories with the most assets.
    pub async fn top_categories(&self, limit: i64) -> AppResult<Vec<CategoryAssetCount>> {
        sqlx::query_as::<_, CategoryAssetCount>(
            "SELECT c.id, c.name, COUNT(a.id) AS asset_count \
             FROM categories c LEFT JOIN assets a ON a.category_id = c.id \
             GROUP BY c.id, c.name ORDER BY asset_count DESC, c.name LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to rank categories"))
    }
}
