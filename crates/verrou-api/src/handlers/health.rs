//! Health check handler.

use axum::Json;
use axum::extract::State;

use verrou_database::DatabasePool;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
///
/// Always 200; a failing database shows up in the `database` field.
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database = if DatabasePool::is_healthy(&state.db_pool).await {
        "connected"
    } else {
        "disconnected"
    };

    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    }))
}
