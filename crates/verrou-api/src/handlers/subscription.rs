//! Subscription tier and purchase handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use verrou_core::types::Page;
use verrou_entity::subscription::{Subscription, UserSubscription, UserSubscriptionDetail};
use verrou_service::billing::{
    CreateSubscriptionRequest, PurchaseSubscriptionRequest, UpdateSubscriptionRequest,
};

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, Pagination, UuidPath, ValidatedJson};
use crate::middleware::rbac::{BILLING, SUBSCRIPTION_READERS, require_staff};
use crate::state::AppState;

/// POST /api/subscriptions
pub async fn create_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateSubscriptionRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Subscription>>)> {
    auth.require_role(BILLING)?;
    let subscription = state.subscription_service.create(&auth, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(subscription, "Subscription created")),
    ))
}

/// GET /api/subscriptions
pub async fn list_subscriptions(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(query): Pagination,
) -> ApiResult<Json<ApiResponse<Page<Subscription>>>> {
    auth.require_role(SUBSCRIPTION_READERS)?;
    let subscriptions = state.subscription_service.list(&query).await?;
    Ok(Json(ApiResponse::ok(subscriptions)))
}

/// GET /api/subscriptions/all-users-subscriptions
pub async fn list_purchases(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(query): Pagination,
) -> ApiResult<Json<ApiResponse<Page<UserSubscriptionDetail>>>> {
    require_staff(&auth)?;
    let purchases = state.subscription_service.list_purchases(&query).await?;
    Ok(Json(ApiResponse::ok(purchases)))
}

/// POST /api/subscriptions/user-make-subscription
pub async fn purchase(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedJson(req): ValidatedJson<PurchaseSubscriptionRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserSubscription>>)> {
    let purchase = state.subscription_service.purchase(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(purchase, "Subscription activated")),
    ))
}

/// PATCH /api/subscriptions/{id}/status
pub async fn toggle_status(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<ApiResponse<Subscription>>> {
    auth.require_role(BILLING)?;
    let subscription = state.subscription_service.toggle_status(&auth, id).await?;
    Ok(Json(ApiResponse::ok(subscription)))
}

/// PATCH /api/subscriptions/{id}
pub async fn update_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(req): ValidatedJson<UpdateSubscriptionRequest>,
) -> ApiResult<Json<ApiResponse<Subscription>>> {
    auth.require_role(BILLING)?;
    let subscription = state.subscription_service.update(&auth, id, req).await?;
    Ok(Json(ApiResponse::with_message(subscription, "Subscription updated")))
}

/// DELETE /api/subscriptions/{id}
pub async fn delete_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<ApiResponse<()>>> {
    auth.require_role(BILLING)?;
    state.subscription_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::message("Subscription deleted")))
}
