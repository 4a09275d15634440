#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use payhere_api::auth::jwt::JwtConfig;
use payhere_api::config::ServerConfig;
use payhere_api::routes;
use payhere_api::state::AppState;
use payhere_db::memory::MemoryStore;

pub const PHONE: &str = "010-1234-5678";
pub const PASSWORD: &str = "Payhere1!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            expiry_hours: 24,
        },
    }
}

/// The full application over an in-memory store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

/// Build the same router `main.rs` serves, backed by a fresh [`MemoryStore`].
pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

/// Like [`build_test_app`] with a custom configuration.
pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(
        config,
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );
    TestApp {
        router: routes::build_app(state),
        store,
    }
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response {
    app.router.clone().oneshot(request).await.unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: &TestApp, uri: &str, token: Option<&str>) -> Response {
    send(app, request(Method::GET, uri, token, None)).await
}

pub async fn post_json(app: &TestApp, uri: &str, token: Option<&str>, body: &Value) -> Response {
    send(app, request(Method::POST, uri, token, Some(body))).await
}

pub async fn patch_json(app: &TestApp, uri: &str, token: &str, body: &Value) -> Response {
    send(app, request(Method::PATCH, uri, Some(token), Some(body))).await
}

pub async fn delete(app: &TestApp, uri: &str, token: &str) -> Response {
    send(app, request(Method::DELETE, uri, Some(token), None)).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register `phone` and return a fresh access token for it.
pub async fn signup_and_login(app: &TestApp, phone: &str) -> String {
    let credentials = serde_json::json!({ "mobileID": phone, "password": PASSWORD });

    let response = post_json(app, "/users", None, &credentials).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(app, "/users/login", None, &credentials).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["data"]["accessToken"].as_str().unwrap().to_string()
}
