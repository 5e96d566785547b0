//! Found-asset signal handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use verrou_entity::signal::Signal;
use verrou_service::catalog::CreateSignalInput;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, MultipartForm};
use crate::middleware::rbac::require_client;
use crate::state::AppState;

/// POST /api/signals/create
pub async fn create_signal(
    State(state): State<AppState>,
    auth: AuthUser,
    mut form: MultipartForm,
) -> ApiResult<(StatusCode, Json<ApiResponse<Signal>>)> {
    require_client(&auth)?;
    let input = CreateSignalInput {
        asset_id: form.uuid("asset_id")?,
        place: form.required("place")?.to_string(),
        latitude: form.text("latitude").map(str::to_string),
        longitude: form.text("longitude").map(str::to_string),
        date: form.required("date")?.to_string(),
        heure: form.required("heure")?.to_string(),
        circonstance: form.text("circonstance").map(str::to_string),
        status: form.bool("status")?,
        asset_images: form.take_files("asset_images"),
        place_images: form.take_files("place_images"),
    };
    let signal = state.signal_service.create(&auth, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(signal, "Signal recorded")),
    ))
}
