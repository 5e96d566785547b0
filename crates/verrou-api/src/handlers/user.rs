//! Back-office user management handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use verrou_core::types::Page;
use verrou_entity::user::UserWithRole;
use verrou_service::user::{AdminUpdateUserRequest, CreateUserRequest};

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, Pagination, UuidPath, ValidatedJson};
use crate::middleware::rbac::{require_admin, require_staff};
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(query): Pagination,
) -> ApiResult<Json<ApiResponse<Page<UserWithRole>>>> {
    require_staff(&auth)?;
    let users = state.admin_user_service.list_users(&query).await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<ApiResponse<UserWithRole>>> {
    let user = state.admin_user_service.get_user(id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserWithRole>>)> {
    require_admin(&auth)?;
    let user = state.admin_user_service.create_user(&auth, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(user, "User created")),
    ))
}

/// PATCH /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(req): ValidatedJson<AdminUpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<UserWithRole>>> {
    require_admin(&auth)?;
    let user = state.admin_user_service.update_user(&auth, id, req).await?;
    Ok(Json(ApiResponse::with_message(user, "User updated")))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<ApiResponse<()>>> {
    require_admin(&auth)?;
    state.admin_user_service.delete_user(&auth, id).await?;
    Ok(Json(ApiResponse::message("User deleted")))
}
