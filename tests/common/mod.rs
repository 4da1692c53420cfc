#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use scanwitch::api::{create_router, RouterMode};
use scanwitch::{create_app_state_with_config, AppConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const DEMO_KEY: &str = "demo-key-123";
pub const ADMIN_KEY: &str = "admin-key-456";
pub const TEST_MODEL: &str = "gemini-test";
pub const MULTIPART_BOUNDARY: &str = "scanwitch-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub gemini: MockServer,
}

/// App whose model answers every prompt with `answer`
pub async fn spawn_app(answer: &str) -> TestApp {
    spawn_app_with(answer, |_| {}).await
}

pub async fn spawn_app_with(answer: &str, configure: impl FnOnce(&mut AppConfig)) -> TestApp {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{}:generateContent", TEST_MODEL)))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_answer(answer)))
        .mount(&gemini)
        .await;

    build_app(gemini, configure, RouterMode::Full)
}

/// App whose model endpoint always fails
pub async fn spawn_failing_app() -> TestApp {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend unavailable"))
        .mount(&gemini)
        .await;

    build_app(gemini, |_| {}, RouterMode::Full)
}

pub fn build_app(
    gemini: MockServer,
    configure: impl FnOnce(&mut AppConfig),
    mode: RouterMode,
) -> TestApp {
    let mut config = AppConfig::default();
    config.gemini.api_key = Some("test-google-key".to_string());
    config.gemini.model = TEST_MODEL.to_string();
    config.gemini.base_url = gemini.uri();
    config.worker.processing_delay_ms = 0;
    config.metrics.enabled = false;
    configure(&mut config);

    let state = create_app_state_with_config(&config).expect("failed to build app state");
    let router = create_router(state, mode, None);

    TestApp { router, gemini }
}

pub fn gemini_answer(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 42, "candidatesTokenCount": 3 }
    })
}

pub fn get(uri: &str, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("X-API-Key", key);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, api_key: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(key) = api_key {
        builder = builder.header("X-API-Key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Multipart upload with a single `file` field
pub fn post_upload(uri: &str, filename: &str, contents: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
        b = MULTIPART_BOUNDARY,
        f = filename
    )
    .into_bytes();
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Poll a task until it leaves `processing`
pub async fn wait_for_task(router: &Router, task_id: &str) -> Value {
    use tower::util::ServiceExt;

    let uri = format!("/api/v1/task/{}", task_id);
    for _ in 0..100 {
        let response = router
            .clone()
            .oneshot(get(&uri, Some(DEMO_KEY)))
            .await
            .unwrap();
        let json = body_json(response).await;

        if json["status"] != "processing" {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    panic!("task {} never finished", task_id);
}
