mod common;

use axum::http::{header, StatusCode};
use std::time::Duration;
use tower::ServiceExt;

use common::{get_request, json_request, quote_body, send, test_app, test_app_with};
use prs_quote_backend::config::{RateLimitConfig, Settings};

#[tokio::test]
async fn test_sixth_submission_in_window_is_rejected() {
    let app = test_app().await;
    let router = app.router();

    for _ in 0..5 {
        let (status, _) = send(&router, json_request("POST", "/api/quotes", &quote_body(), "10.3.0.1")).await;
        assert_eq!(status, StatusCode::OK);
    }

    let resp = router
        .clone()
        .oneshot(json_request("POST", "/api/quotes", &quote_body(), "10.3.0.1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = resp.headers()[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after > 0 && retry_after <= 900);

    let (status, body) = send(&router, json_request("POST", "/api/quotes", &quote_body(), "10.3.0.1")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "Too many quote requests from this IP, please try again later."
    );

    // Rejected attempts never reach the database.
    let (_, list) = send(&router, get_request("/api/quotes")).await;
    assert_eq!(list["count"], 5);

    // Other clients and other endpoints are unaffected.
    let (status, _) = send(&router, json_request("POST", "/api/quotes", &quote_body(), "10.3.0.2")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&router, get_request("/api/dashboard/stats")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_rejected_submission_is_throttled_before_validation() {
    let mut settings = Settings::from_test_env();
    settings.rate_limit = RateLimitConfig {
        max_requests: 1,
        window_secs: 60,
    };
    let app = test_app_with(settings).await;
    let router = app.router();

    let empty = serde_json::json!({});
    let (status, _) = send(&router, json_request("POST", "/api/quotes", &empty, "10.3.1.1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&router, json_request("POST", "/api/quotes", &quote_body(), "10.3.1.1")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_quota_resets_after_window() {
    let mut settings = Settings::from_test_env();
    settings.rate_limit = RateLimitConfig {
        max_requests: 2,
        window_secs: 1,
    };
    let app = test_app_with(settings).await;
    let router = app.router();

    for _ in 0..2 {
        let (status, _) = send(&router, json_request("POST", "/api/quotes", &quote_body(), "10.3.2.1")).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = send(&router, json_request("POST", "/api/quotes", &quote_body(), "10.3.2.1")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let (status, _) = send(&router, json_request("POST", "/api/quotes", &quote_body(), "10.3.2.1")).await;
    assert_eq!(status, StatusCode::OK);
}
