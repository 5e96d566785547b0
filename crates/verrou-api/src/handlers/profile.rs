//! Self-service profile handlers.

use axum::Json;
use axum::extract::State;

use verrou_core::error::AppError;
use verrou_entity::user::{User, UserWithRole};
use verrou_service::user::{ChangePasswordRequest, UpdateProfileRequest};

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, MultipartForm, ValidatedJson};
use crate::state::AppState;

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<UserWithRole>>> {
    let user = state.profile_service.get_profile(&auth).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PATCH /api/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<UserWithRole>>> {
    let user = state.profile_service.update_profile(&auth, req).await?;
    Ok(Json(ApiResponse::with_message(user, "Profile updated")))
}

/// PATCH /api/profile/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.profile_service.change_password(&auth, req).await?;
    Ok(Json(ApiResponse::message("Password changed successfully")))
}

/// PATCH /api/profile/upload
pub async fn upload_picture(
    State(state): State<AppState>,
    auth: AuthUser,
    mut form: MultipartForm,
) -> ApiResult<Json<ApiResponse<User>>> {
    let file = form
        .take_file("file")
        .ok_or_else(|| AppError::validation("file is required"))?;
    let user = state.profile_service.upload_picture(&auth, file).await?;
    Ok(Json(ApiResponse::with_message(user, "Profile picture updated")))
}
