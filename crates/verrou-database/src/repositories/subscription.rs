//! Subscription tier and purchase repository.

use sqlx::PgPool;
use uuid::Uuid;

use verrou_core::error::AppError;
use verrou_core::result::AppResult;
use verrou_core::types::{Filter, Page, PageQuery};
use verrou_entity::subscription::{
    Subscription, UpdateSubscription, UserSubscription, UserSubscriptionDetail,
};

use crate::error::{db_err, map_sqlx_error, unique_violation};
use crate::paginate::{ListSpec, paginate};

const TIERS: ListSpec = ListSpec {
    from: "subscriptions",
    select: "*",
    search: &[],
    sortable: &[
        ("created_at", "created_at"),
        ("price", "price"),
        ("asset_remaining", "asset_remaining"),
    ],
};

const PURCHASES: ListSpec = ListSpec {
    from: "user_subscriptions us JOIN users u ON u.id = us.user_id \
           JOIN subscriptions s ON s.id = us.subscription_id",
    select: "us.id, us.transaction_id, us.created_at, us.user_id, u.email AS user_email, \
             u.first_name AS user_first_name, u.last_name AS user_last_name, \
             us.subscription_id, s.asset_remaining, s.price",
    search: &["u.email", "u.first_name", "u.last_name", "us.transaction_id"],
    sortable: &[("created_at", "us.created_at"), ("price", "s.price")],
};

fn map_tier(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match unique_violation(&e).as_deref() {
        Some("subscriptions_asset_remaining_key") => {
            AppError::bad_request("A subscription with this asset count already exists")
        }
        _ => map_sqlx_error(context, e),
    }
}

/// Repository for subscription tiers and user purchases.
#[derive(Debug, Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a tier.
    pub async fn create(&self, asset_remaining: i32, price: f64) -> AppResult<Subscription> {
        sqlx::query_as::<_, Subscription>(
            "INSERT INTO subscriptions (asset_remaining, price) VALUES ($1, $2) RETURNING *",
        )
        .bind(asset_remaining)
        .bind(price)
        .fetch_one(&self.pool)
        .await
        .map_err(map_tier("Failed to create subscription"))
    }

    /// Whether another tier grants `asset_remaining` assets.
    pub async fn tier_exists(&self, asset_remaining: i32, exclude: Option<Uuid>) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM subscriptions WHERE asset_remaining = $1 \
             AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(asset_remaining)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to check subscription tier"))
    }

    /// Find a tier by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find subscription"))
    }

    /// Paginated tiers.
    pub async fn list(&self, query: &PageQuery) -> AppResult<Page<Subscription>> {
        paginate(&self.pool, &TIERS, &Filter::new(), query).await
    }

    /// Flip the `status` flag of a tier.
    pub async fn toggle_status(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        sqlx::query_as::<_, Subscription>(
            "UPDATE subscriptions SET status = NOT status, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to toggle subscription"))
    }

    /// Apply a partial update.
    pub async fn update(&self, id: Uuid, data: &UpdateSubscription) -> AppResult<Option<Subscription>> {
        sqlx::query_as::<_, Subscription>(
            "UPDATE subscriptions SET asset_remaining = COALESCE($2, asset_remaining), \
             price = COALESCE($3, price), updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(data.asset_remaining)
        .bind(data.price)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_tier("Failed to update subscription"))
    }

    /// Number of purchases of a tier.
    pub async fn purchase_count(&self, id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM user_subscriptions WHERE subscription_id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to count subscription purchases"))
    }

    /// Delete a tier. Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete subscription"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a purchase and credit the tier's assets to the user, in one
    /// transaction.
    pub async fn purchase(
        &self,
        user_id: Uuid,
        subscription: &Subscription,
        transaction_id: &str,
    ) -> AppResult<UserSubscription> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let purchase = sqlx::query_as::<_, UserSubscription>(
            "INSERT INTO user_subscriptions (user_id, subscription_id, transaction_id) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(user_id)
        .bind(subscription.id)
        .bind(transaction_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to record subscription"))?;

        sqlx::query(
            "UPDATE users SET asset_remaining = asset_remaining + $2, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(subscription.asset_remaining)
        .execute(&mut *tx)
        .await
        .map_err(db_err("Failed to credit assets"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit subscription"))?;
        Ok(purchase)
    }

    /// Paginated purchases with user and tier details.
    pub async fn list_purchases(&self, query: &PageQuery) -> AppResult<Page<UserSubscriptionDetail>> {
        paginate(&self.pool, &PURCHASES, &Filter::new(), query).await
    }
}
