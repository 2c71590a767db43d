//! 通知流水线 - GitHub webhook 事件到 Telegram 消息
//!
//! # 流程
//! 1. 去重：`DeliveryDeduplicator` 按 delivery id 过滤重发
//! 2. 分类：`classify` 把事件映射为 `NotificationIntent`
//! 3. 格式化：`formatter::format` 渲染固定模板
//! 4. 发送：`NotificationDispatcher` 后台发送，失败只记日志
//!
//! # 使用示例
//! ```ignore
//! use github_telegram_relay::{EventEnvelope, NotificationBuilder, RelayConfig};
//!
//! let ingestor = NotificationBuilder::new(RelayConfig::load(None)?).build()?;
//! let ingested = ingestor.ingest(EventEnvelope::new("ping", serde_json::json!({})));
//! ```

pub mod builder;
pub mod channel;
pub mod channels;
pub mod classifier;
pub mod deduplicator;
pub mod dispatcher;
pub mod event;
pub mod formatter;
pub mod ingestor;

pub use builder::NotificationBuilder;
pub use channel::{NotificationChannel, SendResult};
pub use classifier::classify;
pub use deduplicator::DeliveryDeduplicator;
pub use dispatcher::NotificationDispatcher;
pub use event::{EventEnvelope, NotificationIntent, WorkflowOutcome};
pub use formatter::{msg, RenderedMessage};
pub use ingestor::{EventIngestor, IngestOutcome, Ingested};
