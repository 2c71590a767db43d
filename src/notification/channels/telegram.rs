//! Telegram 渠道 - 通过 Bot API `sendMessage` 发送 Markdown 消息

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use crate::notification::channel::{NotificationChannel, SendResult};
use crate::notification::formatter::RenderedMessage;

/// 默认 Bot API 地址
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// Telegram 渠道配置
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot token
    pub bot_token: String,
    /// Chat ID
    pub chat_id: String,
    /// Bot API 地址（测试时可指向本地 mock）
    pub api_base_url: String,
    /// 请求超时
    pub timeout: Duration,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// `sendMessage` 请求体
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// Bot API 响应
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram 渠道
#[derive(Debug)]
pub struct TelegramChannel {
    client: Client,
    config: TelegramConfig,
}

impl TelegramChannel {
    /// 创建 Telegram 渠道
    pub fn new(config: TelegramConfig) -> Result<Self> {
        if config.bot_token.is_empty() {
            anyhow::bail!("bot_token is required");
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.bot_token
        )
    }
}

#[async_trait]
impl NotificationChannel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn destination(&self) -> &str {
        &self.config.chat_id
    }

    async fn send(&self, message: &RenderedMessage) -> Result<SendResult> {
        let chat_id = message.destination.as_deref().unwrap_or(&self.config.chat_id);
        let request = SendMessageRequest {
            chat_id,
            text: &message.text,
            parse_mode: "Markdown",
        };

        // URL 含 token，错误信息里不输出
        let response = self
            .client
            .post(self.send_message_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("HTTP request failed: {}", e.without_url()))?;

        let status = response.status();
        let body: Option<ApiResponse> = response.json().await.ok();

        match body {
            Some(ApiResponse { ok: true, .. }) if status.is_success() => {
                info!(channel = "telegram", chat_id = %chat_id, "Message sent successfully");
                Ok(SendResult::Sent)
            }
            other => {
                let reason = other
                    .and_then(|b| b.description)
                    .unwrap_or_else(|| format!("HTTP {}", status));
                error!(channel = "telegram", chat_id = %chat_id, error = %reason, "Telegram rejected message");
                Ok(SendResult::Failed(reason))
            }
        }
    }
}
