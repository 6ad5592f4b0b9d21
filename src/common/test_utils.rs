//! Helpers for router-level tests

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use super::config::{lookup_from_pairs, Config};
use super::AppState;
use crate::services::{IdentityProvider, UnconfiguredProvider};
use crate::users::{MockUserStore, UserStore};

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// All `Set-Cookie` header values
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(axum::http::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect()
    }

    /// The envelope invariant every response must satisfy
    pub fn assert_envelope(&self) {
        let success = self.body["success"]
            .as_bool()
            .unwrap_or_else(|| panic!("missing boolean success in {}", self.body));
        if success {
            assert!(self.body.get("error").is_none(), "success with error: {}", self.body);
        } else {
            assert!(self.body["error"].is_string(), "failure without error: {}", self.body);
            assert!(self.body.get("data").is_none(), "failure with data: {}", self.body);
        }
    }
}

/// Install a DEBUG-level subscriber for the current thread until the guard
/// drops. `#[tokio::test]` runs on one thread, so the whole request is covered.
pub fn debug_logging() -> tracing::subscriber::DefaultGuard {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// A JSON document just over `max_body_bytes`
pub fn oversized_json(max_body_bytes: usize) -> String {
    format!(r#"{{"email":"{}"}}"#, "a".repeat(max_body_bytes))
}

pub fn test_config() -> Config {
    Config::from_lookup(lookup_from_pairs(&[("APP_ENV", "test")])).expect("test config")
}

pub fn test_app_with(
    identity: Arc<dyn IdentityProvider>,
    users: Arc<dyn UserStore>,
) -> Router {
    crate::build_router(Arc::new(AppState::new(test_config(), identity, users)))
}

pub fn test_app() -> Router {
    test_app_with(Arc::new(UnconfiguredProvider), Arc::new(MockUserStore))
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
    headers: &[(&str, &str)],
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("non-JSON body ({e}): {:?}", String::from_utf8_lossy(&bytes)));

    let response = TestResponse {
        status,
        headers,
        body,
    };
    response.assert_envelope();
    response
}

pub async fn send_json(app: Router, method: Method, uri: &str, body: &str) -> TestResponse {
    send(
        app,
        method,
        uri,
        Some(body),
        &[("content-type", "application/json")],
    )
    .await
}
