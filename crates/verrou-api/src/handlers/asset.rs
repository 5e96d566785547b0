//! Asset handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use verrou_core::error::AppError;
use verrou_core::types::Page;
use verrou_entity::asset::{Asset, AssetView};
use verrou_service::catalog::{AssetDetail, CreateAssetInput, UpdateAssetRequest, UserAssets};
use verrou_storage::UploadedFile;

use crate::dto::request::AssetListQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, MultipartForm, Pagination, QueryParams, UuidPath, ValidatedJson};
use crate::middleware::rbac::{require_client, require_staff};
use crate::state::AppState;

/// POST /api/assets
pub async fn create_asset(
    State(state): State<AppState>,
    auth: AuthUser,
    mut form: MultipartForm,
) -> ApiResult<(StatusCode, Json<ApiResponse<Asset>>)> {
    require_client(&auth)?;
    let data = form
        .json::<serde_json::Value>("data")?
        .ok_or_else(|| AppError::validation("data is required"))?;
    let input = CreateAssetInput {
        data,
        category_id: form.required_uuid("category_id")?,
        images: form.take_files("images"),
        invoices: form.take_files("invoices"),
    };
    let asset = state.asset_service.create(&auth, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(asset, "Asset registered")),
    ))
}

/// GET /api/assets
pub async fn list_assets(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(query): Pagination,
) -> ApiResult<Json<ApiResponse<Page<AssetView>>>> {
    require_staff(&auth)?;
    let assets = state.asset_service.list(&query).await?;
    Ok(Json(ApiResponse::ok(assets)))
}

/// GET /api/assets/all/user
pub async fn list_own_assets(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<AssetListQuery>,
) -> ApiResult<Json<ApiResponse<UserAssets>>> {
    require_client(&auth)?;
    let assets = state
        .asset_service
        .list_for_user(&auth, query.filter, query.search_key.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(assets)))
}

/// GET /api/assets/categories/{id}
pub async fn list_by_category(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(category_id): UuidPath,
    Pagination(query): Pagination,
) -> ApiResult<Json<ApiResponse<Page<AssetView>>>> {
    require_staff(&auth)?;
    let assets = state
        .asset_service
        .list_by_category(category_id, &query)
        .await?;
    Ok(Json(ApiResponse::ok(assets)))
}

/// GET /api/assets/users/categories/{id}
pub async fn list_own_by_category(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(category_id): UuidPath,
    Pagination(query): Pagination,
) -> ApiResult<Json<ApiResponse<Page<AssetView>>>> {
    require_staff(&auth)?;
    let assets = state
        .asset_service
        .list_own_by_category(&auth, category_id, &query)
        .await?;
    Ok(Json(ApiResponse::ok(assets)))
}

/// GET /api/assets/{id}
pub async fn get_asset(
    State(state): State<AppState>,
    _auth: AuthUser,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<ApiResponse<AssetDetail>>> {
    let asset = state.asset_service.get(id).await?;
    Ok(Json(ApiResponse::ok(asset)))
}

/// GET /api/assets/search/{key}
pub async fn search_assets(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<AssetView>>>> {
    let assets = state.asset_service.search(&key).await?;
    Ok(Json(ApiResponse::ok(assets)))
}

/// PATCH /api/assets/{id}
pub async fn update_asset(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(req): ValidatedJson<UpdateAssetRequest>,
) -> ApiResult<Json<ApiResponse<Asset>>> {
    require_client(&auth)?;
    let asset = state.asset_service.update(&auth, id, req).await?;
    Ok(Json(ApiResponse::with_message(asset, "Asset updated")))
}

/// Kept paths and new uploads of an attachment list edit.
fn attachment_edit(
    form: &mut MultipartForm,
    existing_field: &str,
    files_field: &str,
) -> Result<(Vec<String>, Vec<UploadedFile>), AppError> {
    let existing = form.json::<Vec<String>>(existing_field)?.unwrap_or_default();
    Ok((existing, form.take_files(files_field)))
}

/// PATCH /api/assets/{id}/images
pub async fn update_images(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
    mut form: MultipartForm,
) -> ApiResult<Json<ApiResponse<Asset>>> {
    require_client(&auth)?;
    let (existing, files) = attachment_edit(&mut form, "existing_images", "images")?;
    let asset = state
        .asset_service
        .update_images(&auth, id, existing, files)
        .await?;
    Ok(Json(ApiResponse::with_message(asset, "Images updated")))
}

/// PATCH /api/assets/{id}/invoices
pub async fn update_invoices(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
    mut form: MultipartForm,
) -> ApiResult<Json<ApiResponse<Asset>>> {
    require_client(&auth)?;
    let (existing, files) = attachment_edit(&mut form, "existing_invoices", "invoices")?;
    let asset = state
        .asset_service
        .update_invoices(&auth, id, existing, files)
        .await?;
    Ok(Json(ApiResponse::with_message(asset, "Invoices updated")))
}

/// PATCH /api/assets/{id}/verify
pub async fn toggle_verified(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<ApiResponse<Asset>>> {
    require_staff(&auth)?;
    let asset = state.asset_service.toggle_verified(&auth, id).await?;
    let message = if asset.is_verified {
        "Asset validated"
    } else {
        "Asset rejected"
    };
    Ok(Json(ApiResponse::with_message(asset, message)))
}

/// DELETE /api/assets/{id}
pub async fn delete_asset(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<ApiResponse<()>>> {
    require_client(&auth)?;
    state.asset_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::message("Asset deleted")))
}
