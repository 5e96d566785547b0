use axum::http::StatusCode;

use verrou_entity::role::RoleName;

use crate::helpers::TestApp;

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/does-not-exist", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_uuid_in_path_is_a_validation_error() {
    let app = TestApp::new().await;
    let token = app.token_for(RoleName::Admin);

    let response = app
        .request("GET", "/api/users/not-a-uuid", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_upload_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/uploads/profile/nothing.png", None, None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
