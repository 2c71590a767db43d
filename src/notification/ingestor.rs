//! 事件接收器 - 流水线入口
//!
//! 去重 → 分类 → 格式化 → 后台发送。不等待发送结果，
//! 所以 webhook 调用方总能立即拿到确认。

use std::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::channel::SendResult;
use super::classifier::classify;
use super::deduplicator::DeliveryDeduplicator;
use super::dispatcher::NotificationDispatcher;
use super::event::{EventEnvelope, NotificationIntent};
use super::formatter;

/// 处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// 重复投递，已跳过
    Duplicate,
    /// 进行中的 run
    Suppressed,
    /// workflow_run / check_run 缺少 run 对象
    Incomplete,
    /// 不支持的事件类型
    Unrecognized,
    /// 已交给分发器
    Dispatched,
}

impl IngestOutcome {
    /// HTTP 响应文本
    pub fn ack_text(&self) -> &'static str {
        match self {
            IngestOutcome::Duplicate => "Entrega duplicada ignorada",
            IngestOutcome::Suppressed => "Aguardando conclusão",
            IngestOutcome::Incomplete => "Payload incompleto",
            IngestOutcome::Unrecognized | IngestOutcome::Dispatched => "Webhook recebido com sucesso!",
        }
    }
}

/// 一次 ingest 的结果
#[derive(Debug)]
pub struct Ingested {
    pub outcome: IngestOutcome,
    /// 后台发送任务（仅 Dispatched 时存在）
    pub delivery: Option<JoinHandle<SendResult>>,
}

impl Ingested {
    fn done(outcome: IngestOutcome) -> Self {
        Self { outcome, delivery: None }
    }
}

/// 事件接收器
pub struct EventIngestor {
    /// 去重缓存，锁只在检查+插入期间持有
    dedup: Mutex<DeliveryDeduplicator>,
    dispatcher: NotificationDispatcher,
}

impl EventIngestor {
    pub fn new(dispatcher: NotificationDispatcher) -> Self {
        Self::with_deduplicator(dispatcher, DeliveryDeduplicator::new())
    }

    pub fn with_deduplicator(dispatcher: NotificationDispatcher, dedup: DeliveryDeduplicator) -> Self {
        Self {
            dedup: Mutex::new(dedup),
            dispatcher,
        }
    }

    /// 处理一个事件
    ///
    /// 需要在 tokio runtime 中调用（发送会被 spawn）。
    pub fn ingest(&self, envelope: EventEnvelope) -> Ingested {
        info!(
            event = %envelope.event_type,
            delivery = ?envelope.delivery_id,
            received_at = %envelope.received_at,
            "Webhook received"
        );

        if self.is_duplicate(envelope.delivery_id.as_deref()) {
            info!(delivery = ?envelope.delivery_id, "Duplicate delivery ignored");
            return Ingested::done(IngestOutcome::Duplicate);
        }

        let intent = classify(&envelope);
        debug!(event = %envelope.event_type, intent = intent.kind(), "Event classified");

        match formatter::format(&intent) {
            Some(message) => Ingested {
                outcome: IngestOutcome::Dispatched,
                delivery: Some(self.dispatcher.dispatch_detached(message)),
            },
            None if intent == NotificationIntent::Suppressed => {
                if missing_run_object(&envelope) {
                    warn!(event = %envelope.event_type, "Run object missing from payload");
                    return Ingested::done(IngestOutcome::Incomplete);
                }
                info!(
                    event = %envelope.event_type,
                    action = ?envelope.action(),
                    "Run not completed, waiting for completion"
                );
                Ingested::done(IngestOutcome::Suppressed)
            }
            None => {
                debug!(event = %envelope.event_type, "Unrecognized event ignored");
                Ingested::done(IngestOutcome::Unrecognized)
            }
        }
    }

    /// 原子地检查并登记 delivery id
    fn is_duplicate(&self, delivery_id: Option<&str>) -> bool {
        // 锁中毒时继续使用内部数据，去重缓存没有跨操作的不变量会被破坏
        let mut dedup = self.dedup.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        dedup.is_duplicate(delivery_id)
    }
}

/// run 事件的 payload 里以事件名为键的对象不存在
fn missing_run_object(envelope: &EventEnvelope) -> bool {
    !envelope
        .payload
        .get(envelope.event_type.as_str())
        .is_some_and(|run| run.is_object())
}
