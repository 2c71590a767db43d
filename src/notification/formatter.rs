//! 消息格式化模块 - 将通知意图渲染为 Telegram Markdown 消息
//!
//! 设计原则：
//! 1. 固定模板 - 每种意图一个模板，字段带标签和 emoji
//! 2. 不转义 - 插值字段中的 Markdown 特殊字符原样输出
//! 3. Suppressed / Unrecognized 不产生消息

use serde::{Deserialize, Serialize};

use super::event::{NotificationIntent, WorkflowOutcome};

/// 通知文案常量（葡萄牙语，与现有聊天频道保持一致）
pub mod msg {
    pub const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━━━";

    // 标题
    pub const PUSH_TITLE: &str = "🛠️ *Novo Commit Detectado*";
    pub const WORKFLOW_TITLE: &str = "🏗️ *Status do Build/Action*";
    pub const PING_TITLE: &str = "🏓 *Webhook do GitHub conectado com sucesso!*";
    pub const PING_BODY: &str = "Agora os próximos pushes e deploys aparecerão aqui.";

    // 字段标签
    pub const REPOSITORY: &str = "📦 *Repositório:*";
    pub const BRANCH: &str = "🌿 *Branch:*";
    pub const AUTHOR: &str = "👤 *Autor:*";
    pub const MESSAGE: &str = "📝 *Mensagem:*";
    pub const TASK: &str = "🔨 *Tarefa:*";
    pub const RESULT: &str = "📊 *Resultado:*";

    // 链接文字
    pub const VIEW_ON_GITHUB: &str = "Ver no GitHub";
    pub const ACTION_LOGS: &str = "Logs da Action";

    // 结论
    pub const SUCCESS: &str = "Sucesso";
    pub const FAILURE: &str = "Falha";
    pub const CANCELLED: &str = "Cancelado";
    pub const PENDING: &str = "Pendente";
}

/// 渲染后的消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    /// Markdown 文本
    pub text: String,
    /// 目标 chat id（由 dispatcher 根据渠道配置填充）
    pub destination: Option<String>,
}

impl RenderedMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            destination: None,
        }
    }

    /// 设置目标 chat id
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }
}

/// 结论对应的图标和文字，映射是完整的
pub fn outcome_badge(outcome: WorkflowOutcome) -> (&'static str, &'static str) {
    match outcome {
        WorkflowOutcome::Success => ("✅", msg::SUCCESS),
        WorkflowOutcome::Failure => ("❌", msg::FAILURE),
        WorkflowOutcome::Cancelled => ("🚫", msg::CANCELLED),
        WorkflowOutcome::Other => ("🔄", msg::PENDING),
    }
}

/// 渲染通知意图
///
/// `Suppressed` 和 `Unrecognized` 返回 `None`，不会触发发送。
pub fn format(intent: &NotificationIntent) -> Option<RenderedMessage> {
    let text = match intent {
        NotificationIntent::Push { repo, branch, author, message, url } => format!(
            "{title}\n{sep}\n{repo_label} `{repo}`\n{branch_label} `{branch}`\n{author_label} {author}\n{message_label} {message}\n\n🔗 [{link}]({url})",
            title = msg::PUSH_TITLE,
            sep = msg::SEPARATOR,
            repo_label = msg::REPOSITORY,
            branch_label = msg::BRANCH,
            author_label = msg::AUTHOR,
            message_label = msg::MESSAGE,
            link = msg::VIEW_ON_GITHUB,
        ),
        NotificationIntent::WorkflowResult { repo, task, outcome, url } => {
            let (icon, label) = outcome_badge(*outcome);
            format!(
                "{title}\n{sep}\n{repo_label} `{repo}`\n{task_label} {task}\n{result_label} {icon} *{label}*\n\n🔗 [{link}]({url})",
                title = msg::WORKFLOW_TITLE,
                sep = msg::SEPARATOR,
                repo_label = msg::REPOSITORY,
                task_label = msg::TASK,
                result_label = msg::RESULT,
                link = msg::ACTION_LOGS,
            )
        }
        NotificationIntent::PingAck => format!("{}\n\n{}", msg::PING_TITLE, msg::PING_BODY),
        NotificationIntent::Suppressed | NotificationIntent::Unrecognized => return None,
    };

    Some(RenderedMessage::new(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workflow(outcome: WorkflowOutcome) -> NotificationIntent {
        NotificationIntent::WorkflowResult {
            repo: "r".to_string(),
            task: "CI".to_string(),
            outcome,
            url: "https://x".to_string(),
        }
    }

    #[test]
    fn test_format_push() {
        let message = format(&NotificationIntent::Push {
            repo: "relay".to_string(),
            branch: "main".to_string(),
            author: "alice".to_string(),
            message: "fix: typo".to_string(),
            url: "https://github.com/o/relay/commit/abc".to_string(),
        })
        .unwrap();

        assert!(message.text.starts_with(msg::PUSH_TITLE));
        assert!(message.text.contains("📦 *Repositório:* `relay`"));
        assert!(message.text.contains("🌿 *Branch:* `main`"));
        assert!(message.text.contains("👤 *Autor:* alice"));
        assert!(message.text.contains("📝 *Mensagem:* fix: typo"));
        assert!(message.text.ends_with("🔗 [Ver no GitHub](https://github.com/o/relay/commit/abc)"));
        assert!(message.destination.is_none());
    }

    #[test]
    fn test_format_failed_workflow() {
        let message = format(&workflow(WorkflowOutcome::Failure)).unwrap();

        assert!(message.text.contains("❌ *Falha*"));
        assert!(message.text.contains("🔨 *Tarefa:* CI"));
        assert!(message.text.contains("(https://x)"));
    }

    #[test]
    fn test_outcome_badges() {
        assert_eq!(outcome_badge(WorkflowOutcome::Success), ("✅", "Sucesso"));
        assert_eq!(outcome_badge(WorkflowOutcome::Failure), ("❌", "Falha"));
        assert_eq!(outcome_badge(WorkflowOutcome::Cancelled), ("🚫", "Cancelado"));
        assert_eq!(outcome_badge(WorkflowOutcome::Other), ("🔄", "Pendente"));

        let message = format(&workflow(WorkflowOutcome::Other)).unwrap();
        assert!(message.text.contains("🔄 *Pendente*"));
    }

    #[test]
    fn test_format_ping() {
        let message = format(&NotificationIntent::PingAck).unwrap();
        assert!(message.text.starts_with(msg::PING_TITLE));
        assert!(message.text.contains(msg::PING_BODY));
    }

    #[test]
    fn test_no_message_for_suppressed_or_unrecognized() {
        assert!(format(&NotificationIntent::Suppressed).is_none());
        assert!(format(&NotificationIntent::Unrecognized).is_none());
    }

    #[test]
    fn test_markdown_not_escaped() {
        let message = format(&NotificationIntent::Push {
            repo: "my_repo".to_string(),
            branch: "main".to_string(),
            author: "a*b".to_string(),
            message: "use `x`".to_string(),
            url: String::new(),
        })
        .unwrap();

        assert!(message.text.contains("`my_repo`"));
        assert!(message.text.contains("a*b"));
        assert!(message.text.contains("use `x`"));
    }
}
