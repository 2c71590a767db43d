//! HTTP 入口 - 接收 GitHub webhook
//!
//! `POST /` 和 `POST /github-webhook` 等价。无论事件是否产生通知、
//! 是否发送成功，都返回 200 和一段纯文本确认。

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::notification::{EventEnvelope, EventIngestor};

/// 健康检查响应
pub const HEALTH_TEXT: &str = "Servidor do Bot do Telegram está rodando! 🚀";

const EVENT_HEADER: &str = "x-github-event";
const DELIVERY_HEADER: &str = "x-github-delivery";

/// GitHub webhook payload 上限 25 MB
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// 构建路由
pub fn router(ingestor: Arc<EventIngestor>) -> Router {
    Router::new()
        .route("/", get(health).post(webhook))
        .route("/github-webhook", axum::routing::post(webhook))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(ingestor)
}

async fn health() -> &'static str {
    HEALTH_TEXT
}

async fn webhook(
    State(ingestor): State<Arc<EventIngestor>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let event_type = header_str(&headers, EVENT_HEADER).unwrap_or_default();
    let payload = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|e| {
            warn!(event = %event_type, error = %e, "Webhook body is not valid JSON");
            Value::Null
        })
    };

    let mut envelope = EventEnvelope::new(event_type, payload);
    if let Some(delivery) = header_str(&headers, DELIVERY_HEADER) {
        envelope = envelope.with_delivery_id(delivery);
    }

    // 不等待发送结果
    let ingested = ingestor.ingest(envelope);
    (StatusCode::OK, ingested.outcome.ack_text())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// 启动 HTTP 服务，收到 Ctrl+C / SIGTERM 后优雅退出
pub async fn serve(ingestor: Arc<EventIngestor>, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(%addr, "Webhook server listening");

    axum::serve(listener, router(ingestor))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Webhook server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(signal = "SIGINT", "Shutdown signal received"),
        _ = terminate => info!(signal = "SIGTERM", "Shutdown signal received"),
    }
}
