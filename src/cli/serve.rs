// src/cli/serve.rs
//! Serve 命令 - 启动 webhook 服务
//!
//! 加载配置（文件 → 环境变量 → 命令行），组装通知流水线并监听 HTTP。

use crate::config::RelayConfig;
use crate::notification::NotificationBuilder;
use crate::server;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Serve 命令参数
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// 配置文件路径（默认 ~/.config/github-telegram-relay/config.json）
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 监听端口（覆盖 PORT）
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Telegram chat id（覆盖 TELEGRAM_CHAT_ID）
    #[arg(long)]
    pub chat_id: Option<String>,

    /// 发送超时（秒）
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Dry-run 模式（只打印不发送）
    #[arg(long)]
    pub dry_run: bool,
}

impl ServeArgs {
    /// 命令行参数覆盖配置
    pub fn apply_to(&self, config: &mut RelayConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(chat_id) = self.chat_id.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            config.chat_id = Some(chat_id.to_string());
        }
        if let Some(secs) = self.timeout_secs {
            config.dispatch_timeout_secs = secs;
        }
    }
}

/// 处理 serve 命令
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    let mut config = RelayConfig::load(args.config.as_deref())?;
    args.apply_to(&mut config);

    let ingestor = NotificationBuilder::new(config.clone())
        .dry_run(args.dry_run)
        .build()?;

    server::serve(Arc::new(ingestor), config.port).await
}
