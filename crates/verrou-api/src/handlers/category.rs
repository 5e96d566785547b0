//! Category handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use verrou_core::types::Page;
use verrou_entity::category::Category;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, MultipartForm, Pagination, UuidPath};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// POST /api/categories
pub async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    mut form: MultipartForm,
) -> ApiResult<(StatusCode, Json<ApiResponse<Category>>)> {
    require_admin(&auth)?;
    let name = form.required("name")?.to_string();
    let image = form.take_file("image");
    let category = state.category_service.create(&auth, &name, image).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(category, "Category created")),
    ))
}

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
    Pagination(query): Pagination,
) -> ApiResult<Json<ApiResponse<Page<Category>>>> {
    let categories = state.category_service.list(&query).await?;
    Ok(Json(ApiResponse::ok(categories)))
}

/// GET /api/categories/all
pub async fn all_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Category>>>> {
    let categories = state.category_service.all().await?;
    Ok(Json(ApiResponse::ok(categories)))
}

/// GET /api/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<ApiResponse<Category>>> {
    let category = state.category_service.get(id).await?;
    Ok(Json(ApiResponse::ok(category)))
}

/// PATCH /api/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
    mut form: MultipartForm,
) -> ApiResult<Json<ApiResponse<Category>>> {
    require_admin(&auth)?;
    let name = form.text("name").map(str::to_string);
    let image = form.take_file("image");
    let category = state
        .category_service
        .update(&auth, id, name.as_deref(), image)
        .await?;
    Ok(Json(ApiResponse::with_message(category, "Category updated")))
}

/// DELETE /api/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<ApiResponse<()>>> {
    require_admin(&auth)?;
    state.category_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::message("Category deleted")))
}
