//! Registration, login and password recovery handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use verrou_service::auth::{
    CheckOtpRequest, ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, ResetPasswordRequest,
};

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<RegisterResponse>>)> {
    let registered = state.auth_service.register(req).await?;
    let message = registered.message.clone();
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(registered, message)),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let session = state.auth_service.login(req).await?;
    Ok(Json(ApiResponse::with_message(session, "Login successful")))
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ForgotPasswordRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.auth_service.forgot_password(req).await?;
    Ok(Json(ApiResponse::message("A verification code has been sent to your email")))
}

/// POST /api/auth/forgot-password/check-otp
pub async fn check_otp(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CheckOtpRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.auth_service.check_otp(req).await?;
    Ok(Json(ApiResponse::message("Code verified")))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.auth_service.reset_password(req).await?;
    Ok(Json(ApiResponse::message("Password has been reset")))
}
