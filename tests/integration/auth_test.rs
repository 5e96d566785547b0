use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use verrou_entity::role::RoleName;

use crate::helpers::TestApp;

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/profile", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), Some("UNAUTHORIZED"));
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/users", None, Some("not-a-jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Invalid token");
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let app = TestApp::new().await;
    let issued = Utc::now() - Duration::hours(app.config.auth.jwt_ttl_hours as i64 + 1);
    let token = app.token_issued_at(RoleName::Admin, issued);

    let response = app.request("GET", "/api/users", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Token has expired");
}

#[tokio::test]
async fn register_rejects_invalid_email_with_field_details() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "first_name": "Awa",
                "last_name": "Traore",
                "email": "not-an-email",
                "password": "Sup3r-secret!"
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("VALIDATION_ERROR"));
    assert!(response.body["details"]["email"].is_array());
}

#[tokio::test]
async fn login_with_malformed_body_is_a_validation_error() {
    let app = TestApp::new().await;

    let response = app
        .request("POST", "/api/auth/login", Some(json!({"email": 42})), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("VALIDATION_ERROR"));
}
