use axum::http::StatusCode;

use verrou_entity::role::RoleName;

use crate::helpers::TestApp;

#[tokio::test]
async fn cleanup_rejects_huge_retention_window() {
    let app = TestApp::new().await;
    let token = app.token_for(RoleName::Admin);

    let response = app
        .request("DELETE", "/api/logs/cleanup?days=9999999999999", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn cleanup_rejects_zero_days() {
    let app = TestApp::new().await;
    let token = app.token_for(RoleName::Admin);

    let response = app
        .request("DELETE", "/api/logs/cleanup?days=0", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
