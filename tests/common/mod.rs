#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt; // for .oneshot()

use prs_quote_backend::app::app::App;
use prs_quote_backend::config::Settings;

pub async fn test_app() -> App {
    test_app_with(Settings::from_test_env()).await
}

pub async fn test_app_with(settings: Settings) -> App {
    App::new(settings).await.expect("Failed to build test app")
}

pub fn quote_body() -> Value {
    json!({
        "firstName": "Jane",
        "lastName": "Citizen",
        "email": "jane@example.com",
        "phone": "0400 000 000",
        "address": "12 Example St",
        "suburb": "Parramatta",
        "postcode": "2150",
        "serviceType": "roof-restoration",
        "roofType": "tile",
        "timeframe": "1-3 months",
        "message": "Leaking near the chimney"
    })
}

pub fn json_request(method: &str, uri: &str, body: &Value, client_ip: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("user-agent", "integration-test/1.0")
        .header("x-forwarded-for", client_ip)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body_bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&body_bytes).into_owned())
        })
    };
    (status, body)
}

/// Submit `quote_body()` from `client_ip` and return the new row id.
pub async fn submit_quote(router: &Router, client_ip: &str) -> i64 {
    let (status, body) = send(router, json_request("POST", "/api/quotes", &quote_body(), client_ip)).await;
    assert_eq!(status, StatusCode::OK, "submission failed: {}", body);
    body["id"].as_i64().expect("id in response")
}
