//! Subscription tiers and the purchases made by users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A purchasable tier granting extra asset slots.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    /// Unique identifier.
    pub id: Uuid,
    /// Asset slots granted; unique per tier.
    pub asset_remaining: i32,
    /// Price of the tier.
    pub price: f64,
    /// Inactive tiers cannot be bought.
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a tier.
#[derive(Debug, Clone, Default)]
pub struct UpdateSubscription {
    pub asset_remaining: Option<i32>,
    pub price: Option<f64>,
}

/// A tier bought by a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSubscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subscription_id: Uuid,
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
}

/// Purchase joined with the buyer and the tier, for back-office listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSubscriptionDetail {
    pub id: Uuid,
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub user_email: String,
    pub user_first_name: String,
    pub user_last_name: String,
    pub subscription_id: Uuid,
    pub asset_remaining: i32,
    pub price: f64,
}
