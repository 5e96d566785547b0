//! Theft/loss alert handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use verrou_core::types::Page;
use verrou_entity::alerte::Alerte;
use verrou_service::catalog::CreateAlerteRequest;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, Pagination, UuidPath, ValidatedJson};
use crate::middleware::rbac::{require_admin, require_client, require_staff};
use crate::state::AppState;

/// POST /api/alertes
pub async fn create_alerte(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateAlerteRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Alerte>>)> {
    require_client(&auth)?;
    let alerte = state.alerte_service.create(&auth, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(alerte, "Alert recorded")),
    ))
}

/// GET /api/alertes
pub async fn list_alertes(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(query): Pagination,
) -> ApiResult<Json<ApiResponse<Page<Alerte>>>> {
    require_staff(&auth)?;
    let alertes = state.alerte_service.list(&query).await?;
    Ok(Json(ApiResponse::ok(alertes)))
}

/// GET /api/alertes/{id}
pub async fn get_alerte(
    State(state): State<AppState>,
    _auth: AuthUser,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<ApiResponse<Alerte>>> {
    let alerte = state.alerte_service.get(id).await?;
    Ok(Json(ApiResponse::ok(alerte)))
}

/// DELETE /api/alertes/{id}
pub async fn delete_alerte(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<ApiResponse<()>>> {
    require_admin(&auth)?;
    state.alerte_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::message("Alert deleted")))
}
