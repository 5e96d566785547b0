//! Donation handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use verrou_core::types::Page;
use verrou_entity::donation::Donation;
use verrou_service::billing::CreateDonationRequest;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, Pagination, ValidatedJson};
use crate::middleware::rbac::require_staff;
use crate::state::AppState;

/// POST /api/donations
pub async fn create_donation(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateDonationRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Donation>>)> {
    let donation = state.donation_service.create(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(donation, "Thank you for your donation")),
    ))
}

/// GET /api/donations
pub async fn list_donations(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(query): Pagination,
) -> ApiResult<Json<ApiResponse<Page<Donation>>>> {
    require_staff(&auth)?;
    let donations = state.donation_service.list(&query).await?;
    Ok(Json(ApiResponse::ok(donations)))
}
