//! Join and session lookup tests.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_join_normalizes_code_and_redirects() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/join", Some("code=+abcd+"), Some("dm"))
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/g/ABCD"));
    assert!(response.issued_uid().is_none());
}

#[tokio::test]
async fn test_join_without_cookie_issues_identity() {
    let app = TestApp::new();

    let response = app.request("POST", "/join", Some("code=XYZ"), None).await;

    let uid = response.issued_uid().expect("uid cookie");
    assert!(!uid.is_empty());

    let lookup = app
        .request("GET", "/api/sessions/XYZ", None, Some(uid.as_str()))
        .await;
    assert_eq!(lookup.body["data"]["isDm"], true);
}

#[tokio::test]
async fn test_blank_code_generates_one() {
    let app = TestApp::new();

    let first = app.join("", "dm").await;
    let second = app.join("", "dm").await;

    assert_eq!(first.len(), app.state.config.session.code_length);
    assert_ne!(first, second);
    assert_eq!(app.state.store.session_count(), 2);
}

#[tokio::test]
async fn test_first_joiner_owns_session() {
    let app = TestApp::new();
    app.join("ABCD", "dm").await;
    app.join("abcd", "player").await;

    let dm = app.request("GET", "/api/sessions/ABCD", None, Some("dm")).await;
    let player = app
        .request("GET", "/api/sessions/abcd", None, Some("player"))
        .await;

    assert_eq!(dm.status, StatusCode::OK);
    assert_eq!(dm.body["data"]["isDm"], true);
    assert_eq!(player.body["data"]["isDm"], false);
    assert_eq!(player.body["data"]["code"], "ABCD");
    assert_eq!(player.body["data"]["round"], 1);
    assert_eq!(player.body["data"]["entityCount"], 0);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/sessions/NOPE", None, Some("dm"))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
    assert_eq!(response.body["message"], "session not found");
}
