//! Webhook 事件与通知意图
//!
//! `EventEnvelope` 是 HTTP 层交给流水线的原始事件，
//! `NotificationIntent` 是分类器的输出，决定是否以及如何发送通知。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 一次 GitHub webhook 投递
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// `x-github-event` 头
    pub event_type: String,
    /// `x-github-delivery` 头（可能缺失）
    pub delivery_id: Option<String>,
    /// 请求体 JSON
    pub payload: Value,
    /// 接收时间（仅用于日志）
    pub received_at: DateTime<Utc>,
}

impl EventEnvelope {
    /// 创建新的事件
    pub fn new(event_type: impl Into<String>, payload: Value) -> Self {
        Self {
            event_type: event_type.into(),
            delivery_id: None,
            payload,
            received_at: Utc::now(),
        }
    }

    /// 设置 delivery id，空字符串视为缺失
    pub fn with_delivery_id(mut self, delivery_id: impl Into<String>) -> Self {
        let id = delivery_id.into();
        self.delivery_id = if id.trim().is_empty() { None } else { Some(id) };
        self
    }

    /// `action` 字段（workflow_run / check_run 使用）
    pub fn action(&self) -> Option<&str> {
        self.payload.get("action").and_then(|v| v.as_str())
    }
}

/// Workflow / check run 的结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowOutcome {
    Success,
    Failure,
    Cancelled,
    /// 其他结论（skipped、timed_out、null 等）
    Other,
}

impl WorkflowOutcome {
    /// 从 `conclusion` 字符串解析，未知值归为 `Other`
    pub fn from_conclusion(conclusion: Option<&str>) -> Self {
        match conclusion {
            Some("success") => WorkflowOutcome::Success,
            Some("failure") => WorkflowOutcome::Failure,
            Some("cancelled") => WorkflowOutcome::Cancelled,
            _ => WorkflowOutcome::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowOutcome::Success => "success",
            WorkflowOutcome::Failure => "failure",
            WorkflowOutcome::Cancelled => "cancelled",
            WorkflowOutcome::Other => "other",
        }
    }
}

impl std::fmt::Display for WorkflowOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 通知意图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationIntent {
    /// 新的 push
    Push {
        repo: String,
        branch: String,
        author: String,
        message: String,
        url: String,
    },
    /// workflow_run / check_run 已完成
    WorkflowResult {
        repo: String,
        task: String,
        outcome: WorkflowOutcome,
        url: String,
    },
    /// GitHub 配置 webhook 时的 ping
    PingAck,
    /// 进行中的 run 或不完整的 payload，不发送通知
    Suppressed,
    /// 不支持的事件类型
    Unrecognized,
}

impl NotificationIntent {
    /// 用于日志的简短名称
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationIntent::Push { .. } => "push",
            NotificationIntent::WorkflowResult { .. } => "workflow_result",
            NotificationIntent::PingAck => "ping_ack",
            NotificationIntent::Suppressed => "suppressed",
            NotificationIntent::Unrecognized => "unrecognized",
        }
    }
}
