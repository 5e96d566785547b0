use axum::http::StatusCode;
use uuid::Uuid;

use verrou_entity::role::RoleName;

use crate::helpers::TestApp;

#[tokio::test]
async fn staff_cannot_register_assets() {
    let app = TestApp::new().await;
    let token = app.token_for(RoleName::Admin);

    let category_id = Uuid::new_v4().to_string();

    let response = app
        .multipart(
            "POST",
            "/api/assets",
            &[("category_id", category_id.as_str())],
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn asset_registration_requires_data() {
    let app = TestApp::new().await;
    let token = app.token_for(RoleName::Client);

    let category_id = Uuid::new_v4().to_string();

    let response = app
        .multipart(
            "POST",
            "/api/assets",
            &[("category_id", category_id.as_str())],
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn asset_registration_requires_multipart_body() {
    let app = TestApp::new().await;
    let token = app.token_for(RoleName::Client);

    let response = app
        .request("POST", "/api/assets", Some(serde_json::json!({})), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn staff_cannot_edit_or_delete_assets() {
    let app = TestApp::new().await;
    let token = app.token_for(RoleName::Secretary);
    let id = Uuid::new_v4();

    let images = app
        .multipart("PATCH", &format!("/api/assets/{id}/images"), &[], Some(&token))
        .await;
    assert_eq!(images.status, StatusCode::FORBIDDEN);

    let invoices = app
        .multipart("PATCH", &format!("/api/assets/{id}/invoices"), &[], Some(&token))
        .await;
    assert_eq!(invoices.status, StatusCode::FORBIDDEN);

    let deleted = app
        .request("DELETE", &format!("/api/assets/{id}"), None, Some(&token))
        .await;
    assert_eq!(deleted.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn asset_routes_require_a_token() {
    let app = TestApp::new().await;
    let id = Uuid::new_v4();

    let response = app
        .request("DELETE", &format!("/api/assets/{id}"), None, None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signal_requires_place() {
    let app = TestApp::new().await;
    let token = app.token_for(RoleName::Client);

    let response = app
        .multipart(
            "POST",
            "/api/signals/create",
            &[("date", "2025-01-10"), ("heure", "14:30")],
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn staff_cannot_signal_found_assets() {
    let app = TestApp::new().await;
    let token = app.token_for(RoleName::Developer);

    let response = app
        .multipart("POST", "/api/signals/create", &[("place", "Cocody")], Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
