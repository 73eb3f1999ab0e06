mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

use common::{get_request, json_request, send, submit_quote, test_app};

/// Poll the summary until `expected` events have been written by the background tasks.
async fn wait_for_events(router: &axum::Router, expected: i64) -> Value {
    for _ in 0..100 {
        let (status, body) = send(router, get_request("/api/analytics")).await;
        assert_eq!(status, StatusCode::OK);
        let total: i64 = body["analytics"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["count"].as_i64().unwrap())
            .sum();
        if total >= expected {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("analytics events were not recorded in time");
}

#[tokio::test]
async fn test_record_and_summarize_events() {
    let app = test_app().await;
    let router = app.router();

    for event in [
        json!({"action": "field_focus", "field": "email"}),
        json!({"action": "field_focus", "field": "email"}),
        json!({"action": "form_start"}),
    ] {
        let (status, body) = send(&router, json_request("POST", "/api/analytics", &event, "10.1.0.1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));
    }

    let body = wait_for_events(&router, 3).await;
    assert_eq!(body["success"], true);
    let rows = body["analytics"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["action"], "field_focus");
    assert_eq!(rows[0]["field"], "email");
    assert_eq!(rows[0]["count"], 2);
    assert_eq!(rows[1]["action"], "form_start");
    assert!(rows[1]["field"].is_null());
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    assert_eq!(rows[0]["date"], today.as_str());

    let (ip, agent): (Option<String>, Option<String>) =
        sqlx::query_as("SELECT ip_address, user_agent FROM form_analytics LIMIT 1")
            .fetch_one(app.pool())
            .await
            .unwrap();
    assert_eq!(ip.as_deref(), Some("10.1.0.1"));
    assert_eq!(agent.as_deref(), Some("integration-test/1.0"));
}

#[tokio::test]
async fn test_unusable_events_are_acknowledged_but_dropped() {
    let app = test_app().await;
    let router = app.router();

    let (status, body) = send(&router, json_request("POST", "/api/analytics", &json!({}), "10.1.0.2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/analytics")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("not json"))
        .unwrap();
    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // A real event afterwards is the only thing that shows up.
    send(&router, json_request("POST", "/api/analytics", &json!({"action": "form_start"}), "10.1.0.2")).await;
    let body = wait_for_events(&router, 1).await;
    let rows = body["analytics"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["action"], "form_start");
    assert_eq!(rows[0]["count"], 1);
}

#[tokio::test]
async fn test_submission_records_form_submit_event() {
    let app = test_app().await;
    let router = app.router();

    submit_quote(&router, "10.1.0.3").await;
    let body = wait_for_events(&router, 1).await;
    let rows = body["analytics"].as_array().unwrap();
    assert_eq!(rows[0]["action"], "form_submit");
    assert_eq!(rows[0]["count"], 1);
}

#[tokio::test]
async fn test_summary_window_excludes_old_events() {
    let app = test_app().await;
    let router = app.router();

    sqlx::query("INSERT INTO form_analytics (action, field, created_at) VALUES ('form_start', NULL, '2000-01-01 10:00:00.000')")
        .execute(app.pool())
        .await
        .unwrap();

    let (status, body) = send(&router, get_request("/api/analytics?days=30")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analytics"], json!([]));

    let (_, body) = send(&router, get_request("/api/analytics?days=100000")).await;
    assert_eq!(body["analytics"][0]["date"], "2000-01-01");

    // Unparseable values fall back to the default window.
    let (status, body) = send(&router, get_request("/api/analytics?days=soon")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analytics"], json!([]));
}
