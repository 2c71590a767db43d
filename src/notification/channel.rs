//! 通知渠道 trait 定义

use anyhow::Result;
use async_trait::async_trait;

use super::formatter::RenderedMessage;

/// 发送结果
#[derive(Debug, Clone, PartialEq)]
pub enum SendResult {
    /// 发送成功
    Sent,
    /// 跳过（未配置目标或 dry-run）
    Skipped(String),
    /// 发送失败
    Failed(String),
}

/// 通知渠道 trait
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 消息的目标（chat id 等）
    fn destination(&self) -> &str;

    /// 发送消息
    ///
    /// 网络错误返回 `Err`，API 拒绝返回 `Ok(SendResult::Failed)`。
    async fn send(&self, message: &RenderedMessage) -> Result<SendResult>;
}
