//! Dashboard aggregates.

use std::sync::Arc;

use uuid::Uuid;

use verrou_core::error::AppError;
use verrou_database::repositories::{AssetRepository, StatsRepository};
use verrou_entity::stats::{AssetOverview, PlatformStats};

use crate::context::RequestContext;

/// Assets listed under `last_assets`.
pub const LAST_ASSETS: i64 = 5;
/// Categories listed under `top_categories`.
pub const TOP_CATEGORIES: i64 = 5;
/// Assets listed under `recent_assets`.
pub const RECENT_ASSETS: i64 = 10;

#[derive(Debug, Clone)]
pub struct DashboardService {
    asset_repo: Arc<AssetRepository>,
    stats_repo: Arc<StatsRepository>,
}

impl DashboardService {
    pub fn new(asset_repo: Arc<AssetRepository>, stats_repo: Arc<StatsRepository>) -> Self {
        Self {
            asset_repo,
            stats_repo,
        }
    }

    /// Platform-wide asset counters.
    pub async fn admin_overview(&self) -> Result<AssetOverview, AppError> {
        self.overview(None).await
    }

    /// The caller's asset counters.
    pub async fn user_overview(&self, ctx: &RequestContext) -> Result<AssetOverview, AppError> {
        self.overview(Some(ctx.user_id)).await
    }

    async fn overview(&self, user_id: Option<Uuid>) -> Result<AssetOverview, AppError> {
        let counts = self.asset_repo.counts(user_id).await?;
        let last_assets = self.asset_repo.latest(user_id, LAST_ASSETS).await?;
        Ok(AssetOverview {
            counts,
            last_assets,
        })
    }

    /// Every platform statistic, queried concurrently.
    pub async fn platform_stats(&self) -> Result<PlatformStats, AppError> {
        let repo = &self.stats_repo;
        let (users, donations, subscriptions, assets, alertes, signals, notifications) = tokio::try_join!(
            repo.users(),
            repo.donations(),
            repo.subscriptions(),
            repo.assets(),
            repo.alertes(),
            repo.signals(),
            repo.notifications(),
        )?;
        let (top_categories, recent_assets) = tokio::try_join!(
            repo.top_categories(TOP_CATEGORIES),
            self.asset_repo.latest(None, RECENT_ASSETS),
        )?;

        Ok(PlatformStats {
            users,
            donations,
            subscriptions,
            assets,
            alertes,
            signals,
            notifications,
            top_categories,
            recent_assets,
        })
    }
}
