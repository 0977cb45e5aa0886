//! Shared harness for exercising the router without binding a socket.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use gridmatch::http::{self, AppState};
use gridmatch::rate_limit::{RateLimitConfig, RateLimiter};
use gridmatch::{GameService, PlayerRegistry};

/// Builds an app with a limiter generous enough to never interfere.
pub fn app() -> Router {
    app_with_limit(10_000)
}

/// Builds an app with the given per-window request budget.
pub fn app_with_limit(max_requests: u32) -> Router {
    let service = Arc::new(GameService::new(Arc::new(PlayerRegistry::new())));
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig {
        max_requests,
        window: Duration::from_secs(60),
        cleanup_interval: Duration::from_secs(60),
    }));
    http::router(AppState { service, limiter })
}

/// Sends one request and returns the raw response.
pub async fn send_raw(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

/// Sends one request and decodes the JSON body (null when empty).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let response = send_raw(app, method, uri, body).await;
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers a player and returns its id.
pub async fn create_player(app: &Router, name: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/players",
        Some(serde_json::json!({ "name": name, "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

/// Creates a game and returns its id.
pub async fn create_game(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/games",
        Some(serde_json::json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}
