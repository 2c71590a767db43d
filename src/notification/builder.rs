//! 通知系统构建器 - 根据配置组装分发器和接收器

use super::channels::telegram::{TelegramChannel, TelegramConfig};
use super::deduplicator::DeliveryDeduplicator;
use super::dispatcher::NotificationDispatcher;
use super::ingestor::EventIngestor;
use crate::config::RelayConfig;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// 通知系统构建器
pub struct NotificationBuilder {
    config: RelayConfig,
    dry_run: bool,
}

impl NotificationBuilder {
    pub fn new(config: RelayConfig) -> Self {
        Self { config, dry_run: false }
    }

    /// 设置 dry-run 模式
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 构建 NotificationDispatcher
    ///
    /// 缺少 token 或 chat id 时返回仅记录日志的分发器。
    pub fn build_dispatcher(&self) -> Result<NotificationDispatcher> {
        let timeout = self.config.dispatch_timeout();
        let mut dispatcher = NotificationDispatcher::new()
            .with_dry_run(self.dry_run)
            .with_timeout(timeout);

        match (&self.config.bot_token, &self.config.chat_id) {
            (Some(token), Some(chat_id)) => {
                let channel = TelegramChannel::new(TelegramConfig {
                    bot_token: token.clone(),
                    chat_id: chat_id.clone(),
                    api_base_url: self.config.api_base_url.clone(),
                    timeout,
                })?;
                dispatcher.register_channel(Arc::new(channel));
            }
            (None, _) => {
                warn!("TELEGRAM_BOT_TOKEN not configured, notifications will only be logged");
            }
            (_, None) => {
                warn!("TELEGRAM_CHAT_ID not configured, notifications will only be logged");
            }
        }

        Ok(dispatcher)
    }

    /// 构建完整的 EventIngestor
    pub fn build(self) -> Result<EventIngestor> {
        let dispatcher = self.build_dispatcher()?;
        let dedup = DeliveryDeduplicator::with_capacity(self.config.dedup_capacity);
        info!(
            dedup_capacity = dedup.capacity(),
            delivery_enabled = self.config.delivery_enabled(),
            dry_run = self.dry_run,
            "Notification pipeline ready"
        );
        Ok(EventIngestor::with_deduplicator(dispatcher, dedup))
    }
}
