//! Push delivery and in-app notification handlers.

use axum::Json;
use axum::extract::State;

use verrou_core::types::Page;
use verrou_entity::notification::Notification;
use verrou_notify::PushOutcome;
use verrou_service::notification::{RegisterTokenRequest, SendPushRequest};

use crate::dto::response::{ApiResponse, CountResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, Pagination, UuidPath, ValidatedJson};
use crate::state::AppState;

/// POST /api/push-notification/send
pub async fn send_push(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SendPushRequest>,
) -> ApiResult<Json<ApiResponse<PushOutcome>>> {
    let outcome = state.notification_service.send_push(req).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// POST /api/push-notification/register-token
pub async fn register_token(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<RegisterTokenRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.notification_service.register_token(&auth, req).await?;
    Ok(Json(ApiResponse::message("Push token registered")))
}

/// GET /api/push-notification/user/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(query): Pagination,
) -> ApiResult<Json<ApiResponse<Page<Notification>>>> {
    let notifications = state
        .notification_service
        .list_for_user(&auth, &query)
        .await?;
    Ok(Json(ApiResponse::ok(notifications)))
}

/// POST /api/push-notification/user/notifications/read/all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    let count = state.notification_service.mark_all_read(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// POST /api/push-notification/user/notifications/read/{id}
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<ApiResponse<Notification>>> {
    let notification = state.notification_service.mark_read(&auth, id).await?;
    Ok(Json(ApiResponse::ok(notification)))
}
