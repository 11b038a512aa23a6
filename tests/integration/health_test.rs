//! Health endpoint tests.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_detailed_health_counts_sessions() {
    let app = TestApp::new();
    app.join("ONE", "dm").await;
    app.join("TWO", "dm").await;

    let response = app.request("GET", "/api/health/detailed", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["sessions"], 2);
    assert_eq!(response.body["data"]["ws_connections"], 0);
    assert_eq!(response.body["data"]["realtime"]["broadcasts"], 0);
}
