//! Subscription tiers and their purchase.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use verrou_core::error::AppError;
use verrou_core::types::{Page, PageQuery};
use verrou_database::repositories::{SubscriptionRepository, UserRepository};
use verrou_entity::subscription::{
    Subscription, UpdateSubscription, UserSubscription, UserSubscriptionDetail,
};

use crate::context::RequestContext;

const DUPLICATE_TIER: &str = "A subscription with this number of assets already exists";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSubscriptionRequest {
    #[validate(range(min = 1, message = "asset_remaining must be positive"))]
    pub asset_remaining: i32,
    #[validate(range(min = 0.0, message = "price cannot be negative"))]
    pub price: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateSubscriptionRequest {
    #[validate(range(min = 1, message = "asset_remaining must be positive"))]
    pub asset_remaining: Option<i32>,
    #[validate(range(min = 0.0, message = "price cannot be negative"))]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PurchaseSubscriptionRequest {
    pub user_id: Uuid,
    pub subscription_id: Uuid,
    #[validate(length(min = 1, message = "transaction_id is required"))]
    pub transaction_id: String,
}

#[derive(Debug, Clone)]
pub struct SubscriptionService {
    subscription_repo: Arc<SubscriptionRepository>,
    user_repo: Arc<UserRepository>,
}

impl SubscriptionService {
    pub fn new(
        subscription_repo: Arc<SubscriptionRepository>,
        user_repo: Arc<UserRepository>,
    ) -> Self {
        Self {
            subscription_repo,
            user_repo,
        }
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateSubscriptionRequest,
    ) -> Result<Subscription, AppError> {
        if self
            .subscription_repo
            .tier_exists(req.asset_remaining, None)
            .await?
        {
            return Err(AppError::bad_request(DUPLICATE_TIER));
        }
        let subscription = self
            .subscription_repo
            .create(req.asset_remaining, req.price)
            .await?;

        info!(
            user_id = %ctx.user_id,
            subscription_id = %subscription.id,
            asset_remaining = subscription.asset_remaining,
            "Subscription tier created"
        );
        Ok(subscription)
    }

    pub async fn list(&self, query: &PageQuery) -> Result<Page<Subscription>, AppError> {
        self.subscription_repo.list(query).await
    }

    /// Purchases with their user and tier.
    pub async fn list_purchases(
        &self,
        query: &PageQuery,
    ) -> Result<Page<UserSubscriptionDetail>, AppError> {
        self.subscription_repo.list_purchases(query).await
    }

    /// Records a purchase and credits the tier's assets to the user.
    pub async fn purchase(
        &self,
        req: PurchaseSubscriptionRequest,
    ) -> Result<UserSubscription, AppError> {
        self.user_repo
            .find_by_id(req.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let subscription = self
            .subscription_repo
            .find_by_id(req.subscription_id)
            .await?
            .ok_or_else(|| AppError::not_found("Subscription not found"))?;
        if !subscription.status {
            return Err(AppError::bad_request("Subscription is not active"));
        }

        let purchase = self
            .subscription_repo
            .purchase(req.user_id, &subscription, req.transaction_id.trim())
            .await?;

        info!(
            user_id = %req.user_id,
            subscription_id = %subscription.id,
            credited = subscription.asset_remaining,
            "Subscription purchased"
        );
        Ok(purchase)
    }

    pub async fn toggle_status(&self, ctx: &RequestContext, id: Uuid) -> Result<Subscription, AppError> {
        let subscription = self
            .subscription_repo
            .toggle_status(id)
            .await?
            .ok_or_else(|| AppError::not_found("Subscription not found"))?;
        info!(
            user_id = %ctx.user_id,
            subscription_id = %id,
            active = subscription.status,
            "Subscription status toggled"
        );
        Ok(subscription)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: UpdateSubscriptionRequest,
    ) -> Result<Subscription, AppError> {
        if let Some(asset_remaining) = req.asset_remaining {
            if self
                .subscription_repo
                .tier_exists(asset_remaining, Some(id))
                .await?
            {
                return Err(AppError::bad_request(DUPLICATE_TIER));
            }
        }

        let changes = UpdateSubscription {
            asset_remaining: req.asset_remaining,
            price: req.price,
        };
        let subscription = self
            .subscription_repo
            .update(id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found("Subscription not found"))?;

        info!(user_id = %ctx.user_id, subscription_id = %id, "Subscription tier updated");
        Ok(subscription)
    }

    /// Deletes a tier nobody has bought.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        let purchases = self.subscription_repo.purchase_count(id).await?;
        if purchases > 0 {
            return Err(AppError::bad_request(format!(
                "Subscription has {purchases} purchase(s) and cannot be deleted"
            )));
        }
        if !self.subscription_repo.delete(id).await? {
            return Err(AppError::not_found("Subscription not found"));
        }
        info!(user_id = %ctx.user_id, subscription_id = %id, "Subscription tier deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_bounds_are_validated() {
        let ok = CreateSubscriptionRequest {
            asset_remaining: 5,
            price: 0.0,
        };
        assert!(ok.validate().is_ok());

        let empty_tier = CreateSubscriptionRequest {
            asset_remaining: 0,
            price: 1000.0,
        };
        assert!(empty_tier.validate().is_err());

        let negative = UpdateSubscriptionRequest {
            price: Some(-1.0),
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }
}
