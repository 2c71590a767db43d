//! GitHub Telegram Relay - 把 GitHub webhook 事件转发为 Telegram 通知

pub mod cli;
pub mod config;
pub mod notification;
pub mod server;

pub use config::RelayConfig;
pub use notification::{
    classify, DeliveryDeduplicator, EventEnvelope, EventIngestor, IngestOutcome, Ingested,
    NotificationBuilder, NotificationChannel, NotificationDispatcher, NotificationIntent,
    RenderedMessage, SendResult, WorkflowOutcome,
};
