//! Role listing handler.

use axum::Json;
use axum::extract::State;

use verrou_entity::role::Role;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_staff;
use crate::state::AppState;

/// GET /api/roles
pub async fn list_roles(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<Role>>>> {
    require_staff(&auth)?;
    let roles = state.role_service.list().await?;
    Ok(Json(ApiResponse::ok(roles)))
}
