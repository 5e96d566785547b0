//! Dashboard handlers.

use axum::Json;
use axum::extract::State;

use verrou_entity::stats::{AssetOverview, PlatformStats};

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::middleware::rbac::{require_client, require_staff};
use crate::state::AppState;

/// GET /api/dashboard/admin
pub async fn admin_overview(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<AssetOverview>>> {
    require_staff(&auth)?;
    let overview = state.dashboard_service.admin_overview().await?;
    Ok(Json(ApiResponse::ok(overview)))
}

/// GET /api/dashboard/user
pub async fn user_overview(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<AssetOverview>>> {
    require_client(&auth)?;
    let overview = state.dashboard_service.user_overview(&auth).await?;
    Ok(Json(ApiResponse::ok(overview)))
}

/// GET /api/dashboard/stats
pub async fn platform_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<PlatformStats>>> {
    require_staff(&auth)?;
    let stats = state.dashboard_service.platform_stats().await?;
    Ok(Json(ApiResponse::ok(stats)))
}
