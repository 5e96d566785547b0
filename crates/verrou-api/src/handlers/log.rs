//! Audit log handlers (admin only).

use axum::Json;
use axum::extract::{Path, State};

use verrou_core::types::Page;
use verrou_entity::log::{Log, LogAction};

use crate::dto::request::CleanupQuery;
use crate::dto::response::{ApiResponse, CountResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, Pagination, QueryParams, UuidPath};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/logs
pub async fn list_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(query): Pagination,
) -> ApiResult<Json<ApiResponse<Page<Log>>>> {
    require_admin(&auth)?;
    let logs = state.log_service.list(&query).await?;
    Ok(Json(ApiResponse::ok(logs)))
}

/// GET /api/logs/action/{action}
pub async fn list_by_action(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(action): Path<String>,
    Pagination(query): Pagination,
) -> ApiResult<Json<ApiResponse<Page<Log>>>> {
    require_admin(&auth)?;
    let action: LogAction = action.parse()?;
    let logs = state.log_service.list_by_action(action, &query).await?;
    Ok(Json(ApiResponse::ok(logs)))
}

/// GET /api/logs/user/{user_id}
pub async fn list_by_user(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(user_id): UuidPath,
    Pagination(query): Pagination,
) -> ApiResult<Json<ApiResponse<Page<Log>>>> {
    require_admin(&auth)?;
    let logs = state.log_service.list_by_user(user_id, &query).await?;
    Ok(Json(ApiResponse::ok(logs)))
}

/// DELETE /api/logs/cleanup?days=90
pub async fn cleanup(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<CleanupQuery>,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    require_admin(&auth)?;
    let count = state.log_service.cleanup(query.days).await?;
    Ok(Json(ApiResponse::with_message(
        CountResponse { count },
        format!("{count} log entries older than {} days deleted", query.days),
    )))
}
