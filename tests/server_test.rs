//! HTTP 入口测试 - 所有请求都返回 200

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use github_telegram_relay::server::{router, HEALTH_TEXT};
use github_telegram_relay::{EventIngestor, NotificationDispatcher};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> axum::Router {
    router(Arc::new(EventIngestor::new(NotificationDispatcher::new())))
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn webhook(path: &str, event: Option<&str>, delivery: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(event) = event {
        builder = builder.header("x-github-event", event);
    }
    if let Some(delivery) = delivery {
        builder = builder.header("x-github-delivery", delivery);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_health_route() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, HEALTH_TEXT);
}

#[tokio::test]
async fn test_both_webhook_paths_accept_events() {
    for path in ["/", "/github-webhook"] {
        let (status, body) = send(app(), webhook(path, Some("ping"), None, "{}")).await;
        assert_eq!(status, StatusCode::OK, "{}", path);
        assert_eq!(body, "Webhook recebido com sucesso!");
    }
}

#[tokio::test]
async fn test_duplicate_delivery_acknowledged() {
    let app = app();
    let body = r#"{"zen":"Anything added dilutes everything else."}"#;

    let (status, text) = send(app.clone(), webhook("/github-webhook", Some("ping"), Some("abc"), body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Webhook recebido com sucesso!");

    let (status, text) = send(app, webhook("/github-webhook", Some("ping"), Some("abc"), body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Entrega duplicada ignorada");
}

#[tokio::test]
async fn test_in_progress_run_acknowledged() {
    let body = r#"{"action":"in_progress","check_run":{"name":"build"}}"#;
    let (status, text) = send(app(), webhook("/", Some("check_run"), Some("c-1"), body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Aguardando conclusão");
}

#[tokio::test]
async fn test_garbage_body_and_missing_headers_still_ok() {
    let (status, _) = send(app(), webhook("/", None, None, "not json at all")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app(), webhook("/github-webhook", Some("push"), Some(""), "")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_large_push_body_accepted() {
    // 超过 axum 默认 2 MB 上限的 push
    let message = "x".repeat(3 * 1024 * 1024);
    let body = serde_json::json!({
        "ref": "refs/heads/main",
        "repository": { "name": "relay", "html_url": "https://github.com/o/relay" },
        "pusher": { "name": "alice" },
        "head_commit": { "message": message, "url": "https://github.com/o/relay/commit/1" }
    })
    .to_string();
    assert!(body.len() > 2 * 1024 * 1024);

    let (status, text) = send(app(), webhook("/github-webhook", Some("push"), Some("big-1"), &body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Webhook recebido com sucesso!");
}

#[tokio::test]
async fn test_missing_run_object_acknowledged_as_incomplete() {
    let body = r#"{"action":"completed","repository":{"name":"r"}}"#;
    let (status, text) = send(app(), webhook("/", Some("workflow_run"), Some("w-1"), body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Payload incompleto");
}
