use axum::http::StatusCode;

use verrou_entity::role::RoleName;

use crate::helpers::TestApp;

#[tokio::test]
async fn client_cannot_list_users() {
    let app = TestApp::new().await;
    let token = app.token_for(RoleName::Client);

    let response = app.request("GET", "/api/users", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), Some("FORBIDDEN"));
}

#[tokio::test]
async fn secretary_cannot_read_audit_logs() {
    let app = TestApp::new().await;
    let token = app.token_for(RoleName::Secretary);

    let response = app.request("GET", "/api/logs", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn staff_cannot_use_client_dashboard() {
    let app = TestApp::new().await;
    let token = app.token_for(RoleName::Developer);

    let response = app
        .request("GET", "/api/dashboard/user", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn plain_user_role_cannot_create_subscription_tiers() {
    let app = TestApp::new().await;
    let token = app.token_for(RoleName::User);

    let response = app
        .request(
            "POST",
            "/api/subscriptions",
            Some(serde_json::json!({"asset_remaining": 5, "price": 5000.0})),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
