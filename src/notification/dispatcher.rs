//! 通知分发器 - 将渲染好的消息投递到渠道
//!
//! fire-and-forget：失败只记录日志，不重试，不向调用方传播。
//! 每次发送都有超时，超时视为失败。

use super::channel::{NotificationChannel, SendResult};
use super::formatter::RenderedMessage;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// 默认发送超时
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

/// 通知分发器
#[derive(Clone)]
pub struct NotificationDispatcher {
    /// 目标渠道，未配置时只记录日志
    channel: Option<Arc<dyn NotificationChannel>>,
    /// 单次发送超时
    timeout: Duration,
    /// 是否为 dry-run 模式
    dry_run: bool,
}

impl NotificationDispatcher {
    /// 创建没有渠道的分发器（仅日志）
    pub fn new() -> Self {
        Self {
            channel: None,
            timeout: DEFAULT_DISPATCH_TIMEOUT,
            dry_run: false,
        }
    }

    /// 设置 dry-run 模式
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 设置发送超时
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 注册渠道
    pub fn register_channel(&mut self, channel: Arc<dyn NotificationChannel>) {
        info!(
            channel = channel.name(),
            destination = channel.destination(),
            "Registering notification channel"
        );
        self.channel = Some(channel);
    }

    /// 是否配置了渠道
    pub fn has_channel(&self) -> bool {
        self.channel.is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 发送消息，错误不会传播
    pub async fn dispatch(&self, message: RenderedMessage) -> SendResult {
        let Some(channel) = &self.channel else {
            info!(text = %message.text, "No chat destination configured, notification logged only");
            return SendResult::Skipped("no destination configured".to_string());
        };

        let message = match message.destination {
            Some(_) => message,
            None => message.with_destination(channel.destination()),
        };

        if self.dry_run {
            info!(
                channel = channel.name(),
                destination = ?message.destination,
                text = %message.text,
                "[DRY-RUN] Would send notification"
            );
            return SendResult::Skipped("dry-run".to_string());
        }

        let result = match tokio::time::timeout(self.timeout, channel.send(&message)).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => SendResult::Failed(e.to_string()),
            Err(_) => SendResult::Failed(format!("timed out after {}ms", self.timeout.as_millis())),
        };

        if let SendResult::Failed(reason) = &result {
            warn!(channel = channel.name(), error = %reason, "Notification dispatch failed");
        }

        result
    }

    /// 在后台发送（spawn 后立即返回）
    ///
    /// 调用方可以忽略返回的 handle；测试中可 await 它拿到结果。
    pub fn dispatch_detached(&self, message: RenderedMessage) -> JoinHandle<SendResult> {
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.dispatch(message).await })
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 测试用的 mock 渠道
    struct MockChannel {
        send_count: AtomicUsize,
        last_destination: Mutex<Option<String>>,
    }

    impl MockChannel {
        fn new() -> Self {
            Self {
                send_count: AtomicUsize::new(0),
                last_destination: Mutex::new(None),
            }
        }

        fn get_send_count(&self) -> usize {
            self.send_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NotificationChannel for MockChannel {
        fn name(&self) -> &str {
            "mock"
        }

        fn destination(&self) -> &str {
            "chat-1"
        }

        async fn send(&self, message: &RenderedMessage) -> Result<SendResult> {
            self.send_count.fetch_add(1, Ordering::SeqCst);
            *self.last_destination.lock().unwrap() = message.destination.clone();
            Ok(SendResult::Sent)
        }
    }

    /// 永远不返回的渠道
    struct HangingChannel;

    #[async_trait]
    impl NotificationChannel for HangingChannel {
        fn name(&self) -> &str {
            "hanging"
        }

        fn destination(&self) -> &str {
            "chat-1"
        }

        async fn send(&self, _message: &RenderedMessage) -> Result<SendResult> {
            std::future::pending::<()>().await;
            Ok(SendResult::Sent)
        }
    }

    /// 网络错误的渠道
    struct ErrorChannel;

    #[async_trait]
    impl NotificationChannel for ErrorChannel {
        fn name(&self) -> &str {
            "error"
        }

        fn destination(&self) -> &str {
            "chat-1"
        }

        async fn send(&self, _message: &RenderedMessage) -> Result<SendResult> {
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn test_dispatch_without_channel_is_skipped() {
        let dispatcher = NotificationDispatcher::new();
        assert!(!dispatcher.has_channel());

        let result = dispatcher.dispatch(RenderedMessage::new("hello")).await;
        assert_eq!(result, SendResult::Skipped("no destination configured".to_string()));
    }

    #[tokio::test]
    async fn test_dispatch_fills_destination() {
        let mut dispatcher = NotificationDispatcher::new();
        let channel = Arc::new(MockChannel::new());
        dispatcher.register_channel(channel.clone());

        let result = dispatcher.dispatch(RenderedMessage::new("hello")).await;

        assert_eq!(result, SendResult::Sent);
        assert_eq!(channel.get_send_count(), 1);
        assert_eq!(channel.last_destination.lock().unwrap().as_deref(), Some("chat-1"));
    }

    #[tokio::test]
    async fn test_dispatcher_dry_run() {
        let mut dispatcher = NotificationDispatcher::new().with_dry_run(true);
        let channel = Arc::new(MockChannel::new());
        dispatcher.register_channel(channel.clone());

        let result = dispatcher.dispatch(RenderedMessage::new("hello")).await;

        assert_eq!(result, SendResult::Skipped("dry-run".to_string()));
        assert_eq!(channel.get_send_count(), 0); // 不应该实际发送
    }

    #[tokio::test]
    async fn test_dispatch_timeout_is_failure() {
        let mut dispatcher = NotificationDispatcher::new().with_timeout(Duration::from_millis(50));
        dispatcher.register_channel(Arc::new(HangingChannel));

        let result = dispatcher.dispatch(RenderedMessage::new("hello")).await;
        assert!(matches!(result, SendResult::Failed(ref reason) if reason.contains("timed out")));
    }

    #[tokio::test]
    async fn test_dispatch_error_is_caught() {
        let mut dispatcher = NotificationDispatcher::new();
        dispatcher.register_channel(Arc::new(ErrorChannel));

        let result = dispatcher.dispatch(RenderedMessage::new("hello")).await;
        assert_eq!(result, SendResult::Failed("connection refused".to_string()));
    }

    #[tokio::test]
    async fn test_dispatch_detached() {
        let mut dispatcher = NotificationDispatcher::new();
        let channel = Arc::new(MockChannel::new());
        dispatcher.register_channel(channel.clone());

        let handle = dispatcher.dispatch_detached(RenderedMessage::new("hello"));
        assert_eq!(handle.await.unwrap(), SendResult::Sent);
        assert_eq!(channel.get_send_count(), 1);
    }
}
