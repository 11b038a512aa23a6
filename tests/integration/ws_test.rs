//! WebSocket upgrade route tests.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_ws_unknown_session_is_not_found() {
    let app = TestApp::new();

    let response = app.request("GET", "/ws/NOPE", None, Some("dm")).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.state.realtime.metrics.snapshot().connections_total, 0);
}

#[tokio::test]
async fn test_ws_known_session_without_upgrade_is_rejected() {
    let app = TestApp::new();
    app.join("ABCD", "dm").await;

    let response = app.request("GET", "/ws/ABCD", None, Some("dm")).await;

    assert!(
        response.status == StatusCode::BAD_REQUEST
            || response.status == StatusCode::UPGRADE_REQUIRED
            || response.status == StatusCode::METHOD_NOT_ALLOWED,
        "Expected an upgrade rejection, got {}",
        response.status
    );
    assert_eq!(app.state.realtime.hub.registry().session_count(), 0);
}
