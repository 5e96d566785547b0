//! Notification inbox, push token registration and push sends.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use verrou_core::error::AppError;
use verrou_core::types::{Page, PageQuery};
use verrou_database::repositories::{NotificationRepository, UserRepository};
use verrou_entity::notification::{CreateNotification, Notification};
use verrou_entity::user::User;
use verrou_notify::push::{ExpoPushClient, PushNotification, PushOutcome};

use crate::context::RequestContext;

/// Body of `POST /push-notification/send`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendPushRequest {
    #[validate(length(min = 1, message = "At least one token is required"))]
    pub tokens: Vec<String>,
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Body is required"))]
    pub body: String,
    pub data: Option<serde_json::Value>,
    pub sound: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterTokenRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// Owns the notification inbox and the push gateway.
#[derive(Debug, Clone)]
pub struct NotificationService {
    notification_repo: Arc<NotificationRepository>,
    user_repo: Arc<UserRepository>,
    push: Arc<ExpoPushClient>,
}

impl NotificationService {
    pub fn new(
        notification_repo: Arc<NotificationRepository>,
        user_repo: Arc<UserRepository>,
        push: Arc<ExpoPushClient>,
    ) -> Self {
        Self {
            notification_repo,
            user_repo,
            push,
        }
    }

    /// Sends an arbitrary push to a list of tokens.
    pub async fn send_push(&self, req: SendPushRequest) -> Result<PushOutcome, AppError> {
        let notification = PushNotification {
            title: req.title,
            body: req.body,
            data: req.data,
            sound: req.sound,
        };
        let outcome = self.push.send(&req.tokens, &notification).await;
        info!(
            requested = req.tokens.len(),
            sent = outcome.sent,
            invalid = outcome.invalid_tokens.len(),
            "Push send completed"
        );
        Ok(outcome)
    }

    /// Stores the caller's Expo token.
    pub async fn register_token(
        &self,
        ctx: &RequestContext,
        req: RegisterTokenRequest,
    ) -> Result<(), AppError> {
        self.user_repo
            .set_push_token(ctx.user_id, req.token.trim())
            .await?;
        info!(user_id = %ctx.user_id, "Push token registered");
        Ok(())
    }

    /// The caller's notifications, newest first.
    pub async fn list_for_user(
        &self,
        ctx: &RequestContext,
        query: &PageQuery,
    ) -> Result<Page<Notification>, AppError> {
        self.notification_repo.list_for_user(ctx.user_id, query).await
    }

    /// Marks every notification of the caller as read.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        let updated = self.notification_repo.mark_all_read(ctx.user_id).await?;
        debug!(user_id = %ctx.user_id, updated, "Notifications marked read");
        Ok(updated)
    }

    /// Marks one of the caller's notifications as read.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: Uuid,
    ) -> Result<Notification, AppError> {
        self.notification_repo
            .mark_read(notification_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))
    }

    /// Pushes to the owner's device in the background, then records the
    /// notification in their inbox.
    pub async fn notify_owner(
        &self,
        owner: &User,
        asset_id: Option<Uuid>,
        title: &str,
        message: &str,
    ) -> Result<Notification, AppError> {
        if let Some(token) = owner.token_notification.clone() {
            let push = Arc::clone(&self.push);
            let payload = PushNotification {
                title: Some(title.to_string()),
                body: message.to_string(),
                data: asset_id.map(|id| serde_json::json!({ "asset_id": id })),
                sound: Some("default".to_string()),
            };
            tokio::spawn(async move {
                push.send_to(Some(&token), &payload).await;
            });
        }

        self.notification_repo
            .create(&CreateNotification {
                user_id: owner.id,
                asset_id,
                title: title.to_string(),
                message: message.to_string(),
            })
            .await
    }
}
