//! 事件分类器 - 将 GitHub webhook 映射为通知意图
//!
//! 纯函数，无副作用。只有事件类型、`action` 和 `conclusion` 参与意图选择，
//! 其余字段只用于填充内容。payload 缺字段时使用默认值，不会 panic。

use serde_json::Value;

use super::event::{EventEnvelope, NotificationIntent, WorkflowOutcome};

/// 没有 head_commit 时的占位文本
pub const NO_COMMIT_MESSAGE: &str = "Sem mensagem de commit";
/// 缺失名称时的占位
const UNKNOWN: &str = "unknown";

/// 对事件分类
pub fn classify(envelope: &EventEnvelope) -> NotificationIntent {
    let payload = &envelope.payload;

    match envelope.event_type.as_str() {
        "push" => classify_push(payload),
        "workflow_run" => classify_run(payload, "workflow_run", "Workflow"),
        "check_run" => classify_run(payload, "check_run", "Check Run"),
        "ping" => NotificationIntent::PingAck,
        _ => NotificationIntent::Unrecognized,
    }
}

fn classify_push(payload: &Value) -> NotificationIntent {
    let repo = str_at(payload, &["repository", "name"]).unwrap_or(UNKNOWN);
    let author = str_at(payload, &["pusher", "name"]).unwrap_or(UNKNOWN);
    let git_ref = str_at(payload, &["ref"]).unwrap_or_default();
    let branch = git_ref.strip_prefix("refs/heads/").unwrap_or(git_ref);

    let (message, url) = match payload.get("head_commit").filter(|c| c.is_object()) {
        Some(commit) => (
            str_at(commit, &["message"]).unwrap_or(NO_COMMIT_MESSAGE),
            str_at(commit, &["url"]).unwrap_or_default(),
        ),
        None => (
            NO_COMMIT_MESSAGE,
            str_at(payload, &["repository", "html_url"]).unwrap_or_default(),
        ),
    };

    NotificationIntent::Push {
        repo: repo.to_string(),
        branch: branch.to_string(),
        author: author.to_string(),
        message: message.to_string(),
        url: url.to_string(),
    }
}

/// workflow_run 和 check_run 共用：只有 completed 才通知（防刷屏）
fn classify_run(payload: &Value, run_key: &str, fallback_task: &str) -> NotificationIntent {
    let Some(run) = payload.get(run_key).filter(|r| r.is_object()) else {
        return NotificationIntent::Suppressed;
    };

    if str_at(payload, &["action"]) != Some("completed") {
        return NotificationIntent::Suppressed;
    }

    let outcome = WorkflowOutcome::from_conclusion(str_at(run, &["conclusion"]));
    let task = str_at(run, &["name"])
        .filter(|name| !name.is_empty())
        .unwrap_or(fallback_task);

    NotificationIntent::WorkflowResult {
        repo: str_at(payload, &["repository", "name"]).unwrap_or(UNKNOWN).to_string(),
        task: task.to_string(),
        outcome,
        url: str_at(run, &["html_url"]).unwrap_or_default().to_string(),
    }
}

/// 按路径取字符串字段
fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |current, key| current.get(key))
        .and_then(|v| v.as_str())
}
