//! Integration tests for cross-cutting error behaviour: request deadlines.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app_with, get, post_json, signup_and_login, test_config, PHONE,
};
use serde_json::json;

use payhere_api::error::REQUEST_TIMEOUT_MESSAGE;

#[tokio::test]
async fn slow_store_hits_the_request_deadline() {
    let mut config = test_config();
    config.request_timeout_secs = 1;
    let app = build_test_app_with(config);
    let token = signup_and_login(&app, PHONE).await;

    app.store.set_latency(Duration::from_secs(2));
    let response = get(&app, "/products", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({ "meta": { "code": 408, "message": REQUEST_TIMEOUT_MESSAGE }, "data": null })
    );
}

#[tokio::test]
async fn timed_out_request_leaves_no_partial_write() {
    let mut config = test_config();
    config.request_timeout_secs = 1;
    let app = build_test_app_with(config);
    let token = signup_and_login(&app, PHONE).await;

    app.store.set_latency(Duration::from_secs(2));
    let body = json!({
        "category": "coffee",
        "price": 4500.0,
        "cost": 1200.0,
        "name": "latte",
        "description": "house blend",
        "barcode": "8801234567890",
        "expiryDate": "2030-01-01T00:00:00Z",
        "size": "small",
    });
    let response = post_json(&app, "/products", Some(&token), &body).await;
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

    // Outlive the dropped store call, then look for its effect.
    tokio::time::sleep(Duration::from_secs(2)).await;
    app.store.set_latency(Duration::ZERO);
    assert!(app.store.product_including_deleted(1).is_none());
}
