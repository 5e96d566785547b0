use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn health_reports_ok_with_database_state() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["status"], "ok");
    assert_eq!(data["database"], "disconnected");
    assert!(data["version"].as_str().is_some_and(|v| !v.is_empty()));
}
