//! Aggregates returned by the dashboard endpoints.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::asset::{AssetCounts, AssetStatus, AssetView};
use crate::category::CategoryAssetCount;

/// Asset totals plus the newest assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetOverview {
    #[serde(flatten)]
    pub counts: AssetCounts,
    pub last_assets: Vec<AssetView>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct UserStats {
    pub total: i64,
    pub active: i64,
    pub verified: i64,
    pub new_this_month: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct DonationStats {
    pub total_amount: f64,
    pub count: i64,
    pub validated: i64,
    /// Mean amount, rounded to two decimals.
    pub average: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct SubscriptionStats {
    /// Number of purchased subscriptions.
    pub count: i64,
    /// Sum of the tier prices over purchases.
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StatusCount {
    pub status: AssetStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetStats {
    pub by_status: Vec<StatusCount>,
    pub verified: i64,
    pub new_this_month: i64,
    pub new_this_week: i64,
}

/// Split of alertes or signals by their `status` flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct ResolutionStats {
    pub total: i64,
    pub resolved: i64,
    pub unresolved: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct NotificationStats {
    pub total: i64,
    pub unread: i64,
}

/// Platform-wide statistics for the back-office.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformStats {
    pub users: UserStats,
    pub donations: DonationStats,
    pub subscriptions: SubscriptionStats,
    pub assets: AssetStats,
    pub alertes: ResolutionStats,
    pub signals: ResolutionStats,
    pub notifications: NotificationStats,
    pub top_categories: Vec<CategoryAssetCount>,
    pub recent_assets: Vec<AssetView>,
}
