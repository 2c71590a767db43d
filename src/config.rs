//! 配置加载
//!
//! 优先级（从低到高）：
//! 1. 默认值
//! 2. `~/.config/github-telegram-relay/config.json`（或 `--config` 指定的文件）
//! 3. 环境变量 `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID` / `PORT`
//! 4. 命令行参数（由 `cli::serve` 合并）
//!
//! 空字符串视为未设置。

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::notification::channels::telegram::DEFAULT_API_BASE_URL;
use crate::notification::deduplicator::DEFAULT_CAPACITY;

/// 默认监听端口
pub const DEFAULT_PORT: u16 = 3000;
/// 默认发送超时（秒）
pub const DEFAULT_DISPATCH_TIMEOUT_SECS: u64 = 10;

/// 运行配置
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    /// Telegram bot token，缺失时不发送
    pub bot_token: Option<String>,
    /// Telegram chat id，缺失时不发送
    pub chat_id: Option<String>,
    /// HTTP 监听端口
    pub port: u16,
    /// Bot API 地址
    pub api_base_url: String,
    /// 单次发送超时（秒）
    pub dispatch_timeout_secs: u64,
    /// 去重缓存容量
    pub dedup_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            port: DEFAULT_PORT,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            dispatch_timeout_secs: DEFAULT_DISPATCH_TIMEOUT_SECS,
            dedup_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// 配置文件结构（所有字段可选）
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    telegram_bot_token: Option<String>,
    telegram_chat_id: Option<ChatIdValue>,
    port: Option<u16>,
    telegram_api_base_url: Option<String>,
    dispatch_timeout_secs: Option<u64>,
    dedup_capacity: Option<usize>,
}

/// chat id 在 JSON 里可能是字符串也可能是数字
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatIdValue {
    Text(String),
    Number(i64),
}

impl ChatIdValue {
    fn into_string(self) -> String {
        match self {
            ChatIdValue::Text(s) => s,
            ChatIdValue::Number(n) => n.to_string(),
        }
    }
}

impl RelayConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/github-telegram-relay/config.json"))
    }

    /// 加载配置：文件 + 进程环境变量
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        match path {
            // 显式指定的文件必须存在
            Some(path) => config.merge_file(path)?,
            None => {
                if let Some(path) = Self::default_path().filter(|p| p.exists()) {
                    config.merge_file(&path)?;
                }
            }
        }

        config.merge_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// 合并 JSON 配置文件
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file: FileConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        if let Some(token) = non_empty(file.telegram_bot_token) {
            self.bot_token = Some(token);
        }
        if let Some(chat_id) = non_empty(file.telegram_chat_id.map(ChatIdValue::into_string)) {
            self.chat_id = Some(chat_id);
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(url) = non_empty(file.telegram_api_base_url) {
            self.api_base_url = url;
        }
        if let Some(secs) = file.dispatch_timeout_secs {
            self.dispatch_timeout_secs = secs;
        }
        if let Some(capacity) = file.dedup_capacity {
            self.dedup_capacity = capacity;
        }

        debug!(path = %path.display(), "Loaded config file");
        Ok(())
    }

    /// 合并环境变量（通过 lookup 注入，便于测试）
    pub fn merge_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = non_empty(lookup("TELEGRAM_BOT_TOKEN")) {
            debug!("Using TELEGRAM_BOT_TOKEN from environment");
            self.bot_token = Some(token);
        }
        if let Some(chat_id) = non_empty(lookup("TELEGRAM_CHAT_ID")) {
            self.chat_id = Some(chat_id);
        }
        if let Some(port) = non_empty(lookup("PORT")).and_then(|p| p.trim().parse().ok()) {
            self.port = port;
        }
    }

    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch_timeout_secs.max(1))
    }

    /// token 和 chat id 都存在时才能发送
    pub fn delivery_enabled(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
