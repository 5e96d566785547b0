use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn send_push_reports_invalid_tokens() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/push-notification/send",
            Some(json!({
                "tokens": ["ExponentPushToken[abc123]", "not-a-token"],
                "title": "Alerte",
                "body": "Un bien a été signalé"
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["sent"], 0);
    assert_eq!(data["invalid_tokens"], json!(["not-a-token"]));
}

#[tokio::test]
async fn send_push_requires_tokens() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/push-notification/send",
            Some(json!({"tokens": [], "body": "hello"})),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["details"]["tokens"].is_array());
}
