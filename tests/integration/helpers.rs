//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use initiative_api::{AppState, build_app};
use initiative_core::config::AppConfig;
use initiative_store::{DiceRoller, SessionStore};

/// Dice that always roll the same number.
#[derive(Debug)]
pub struct LoadedDie(pub i32);

impl DiceRoller for LoadedDie {
    fn roll_d20(&self) -> i32 {
        self.0
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for direct store and engine access
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with `config` and a d20 that always rolls 12
    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(SessionStore::with_dice(
            &config.session,
            Arc::new(LoadedDie(12)),
        ));
        let state = AppState::with_store(config, store);
        let router = build_app(state.clone());
        Self { router, state }
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        form: Option<&str>,
        uid: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);

        if form.is_some() {
            req = req.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        }
        if let Some(uid) = uid {
            req = req.header(header::COOKIE, format!("uid={uid}"));
        }

        let req = req
            .body(Body::from(form.unwrap_or_default().to_string()))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Join (or create) a session as `uid`, returning the session code
    pub async fn join(&self, code: &str, uid: &str) -> String {
        let response = self
            .request("POST", "/join", Some(&format!("code={code}")), Some(uid))
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        response
            .location()
            .and_then(|l| l.strip_prefix("/g/"))
            .expect("redirect to session page")
            .to_string()
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// `Location` header, if any
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Value of the `uid` cookie set by the response, if any
    pub fn issued_uid(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|v| v.strip_prefix("uid="))
            .and_then(|rest| rest.split(';').next())
            .map(str::to_string)
    }
}
