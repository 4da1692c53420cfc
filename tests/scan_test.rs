mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::util::ServiceExt;

use common::{body_json, get, post_json, spawn_app, spawn_failing_app, wait_for_task, DEMO_KEY};

#[tokio::test]
async fn scan_content_returns_model_answer() {
    let app = spawn_app("  This message is legitimate.\n").await;

    let response = app
        .router
        .oneshot(post_json(
            "/api/v1/scan-content",
            Some(DEMO_KEY),
            json!({ "content": "Your parcel is out for delivery" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "completed");
    assert_eq!(json["result"], "This message is legitimate.");
    assert_eq!(json["content_length"], 31);
    assert!(json["scanned_at"].is_string());
}

#[tokio::test]
async fn scan_content_counts_characters_not_bytes() {
    let app = spawn_app("Legitimate").await;

    let content = "é".repeat(10_000);
    let response = app
        .router
        .oneshot(post_json(
            "/api/v1/scan-content",
            Some(DEMO_KEY),
            json!({ "content": content }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["content_length"], 10_000);
}

#[tokio::test]
async fn scan_content_rejects_missing_and_oversized_content() {
    let app = spawn_app("Legitimate").await;

    let cases = [
        (json!({}), "Content is required"),
        (json!({ "content": "" }), "Content is required"),
        (
            json!({ "content": "a".repeat(10_001) }),
            "Content too long (max 10000 characters)",
        ),
    ];

    for (body, expected) in cases {
        let response = app
            .router
            .clone()
            .oneshot(post_json("/api/v1/scan-content", Some(DEMO_KEY), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], expected);
    }
}

#[tokio::test]
async fn scan_content_accepts_json_without_content_type() {
    let app = spawn_app("Legitimate").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/scan-content")
        .header("X-API-Key", DEMO_KEY)
        .body(Body::from(r#"{"content":"hello there"}"#))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/scan-content")
        .header("X-API-Key", DEMO_KEY)
        .body(Body::from("not json"))
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Content is required");
}

#[tokio::test]
async fn scan_content_reports_provider_failure() {
    let app = spawn_failing_app().await;

    let response = app
        .router
        .oneshot(post_json(
            "/api/v1/scan-content",
            Some(DEMO_KEY),
            json!({ "content": "hello" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = body_json(response).await["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Analysis failed: "), "{}", error);
}

#[tokio::test]
async fn scan_url_validates_input() {
    let app = spawn_app("benign").await;

    let cases = [
        (json!({}), "URL is required"),
        (json!({ "url": "example.com" }), "Invalid URL format"),
        (json!({ "url": "ftp://example.com" }), "Invalid URL format"),
    ];

    for (body, expected) in cases {
        let response = app
            .router
            .clone()
            .oneshot(post_json("/api/v1/scan-url", Some(DEMO_KEY), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], expected);
    }
}

#[tokio::test]
async fn scan_url_completes_in_background() {
    let app = spawn_app("phishing").await;

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/v1/scan-url",
            Some(DEMO_KEY),
            json!({ "url": "http://secure-login.paypa1.com/" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let started = body_json(response).await;
    assert_eq!(started["status"], "processing");
    let task_id = started["task_id"].as_str().unwrap().to_string();
    assert_eq!(started["check_url"], format!("/api/v1/task/{}", task_id));

    let task = wait_for_task(&app.router, &task_id).await;
    assert_eq!(task["status"], "completed");
    assert_eq!(task["result"], "phishing");
    assert_eq!(task["category"], "phishing");
    assert_eq!(task["url"], "http://secure-login.paypa1.com/");
    assert!(task["completed_at"].is_string());
}

#[tokio::test]
async fn scan_url_records_provider_failure() {
    let app = spawn_failing_app().await;

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/v1/scan-url",
            Some(DEMO_KEY),
            json!({ "url": "https://www.microsoft.com/" }),
        ))
        .await
        .unwrap();
    let task_id = body_json(response).await["task_id"]
        .as_str()
        .unwrap()
        .to_string();

    let task = wait_for_task(&app.router, &task_id).await;
    assert_eq!(task["status"], "failed");
    assert!(task["error"].is_string());
    assert!(task["failed_at"].is_string());
    assert!(task.get("result").is_none());
}

#[tokio::test]
async fn unknown_task_is_not_found() {
    let app = spawn_app("benign").await;

    let response = app
        .router
        .oneshot(get("/api/v1/task/does-not-exist", Some(DEMO_KEY)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Task not found");
}

#[tokio::test]
async fn stats_count_tasks_by_status() {
    let app = spawn_app("benign").await;

    let response = app
        .router
        .clone()
        .oneshot(get("/api/v1/stats", Some(DEMO_KEY)))
        .await
        .unwrap();
    let stats = body_json(response).await;
    assert_eq!(stats["total_tasks"], 0);
    assert_eq!(stats["active_api_keys"], 2);

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/v1/scan-url",
            Some(DEMO_KEY),
            json!({ "url": "https://www.wikipedia.org/" }),
        ))
        .await
        .unwrap();
    let task_id = body_json(response).await["task_id"]
        .as_str()
        .unwrap()
        .to_string();
    wait_for_task(&app.router, &task_id).await;

    let response = app
        .router
        .oneshot(get("/api/v1/stats", Some(DEMO_KEY)))
        .await
        .unwrap();
    let stats = body_json(response).await;
    assert_eq!(stats["total_tasks"], 1);
    assert_eq!(stats["completed_tasks"], 1);
    assert_eq!(stats["processing_tasks"], 0);
    assert_eq!(stats["failed_tasks"], 0);
    assert!(stats["timestamp"].is_string());
}
