//! 投递去重器 - 防止 GitHub 重发同一个 delivery 导致重复通知
//!
//! GitHub 在超时或手动 redeliver 时会用同一个 `x-github-delivery` 重发事件。
//! 此模块记住最近 N 个 delivery id，重复出现时跳过。
//!
//! ## 去重策略
//! 1. 没有 delivery id 的事件总是视为新事件（不记录）
//! 2. 按插入顺序保存最近 N 个 id（默认 100）
//! 3. 超出容量时淘汰最早插入的 id（FIFO，查询不会刷新顺序）

use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// 默认记住的 delivery 数量
pub const DEFAULT_CAPACITY: usize = 100;

/// 投递去重器
#[derive(Debug)]
pub struct DeliveryDeduplicator {
    /// 插入顺序
    order: VecDeque<String>,
    /// 成员集合
    seen: HashSet<String>,
    /// 最大容量
    capacity: usize,
}

impl DeliveryDeduplicator {
    /// 创建新的去重器，默认容量 100
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// 指定容量（至少为 1）
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            order: VecDeque::with_capacity(capacity + 1),
            seen: HashSet::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// 检查是否为重复投递
    ///
    /// 返回 `true` 表示重复（应跳过），`false` 表示新投递（已记录）。
    /// 没有 id 的投递总是返回 `false` 且不记录。
    pub fn is_duplicate(&mut self, delivery_id: Option<&str>) -> bool {
        let Some(id) = delivery_id else {
            return false;
        };

        if self.seen.contains(id) {
            debug!(delivery = %id, "Duplicate delivery");
            return true;
        }

        self.seen.insert(id.to_string());
        self.order.push_back(id.to_string());

        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.seen.remove(&evicted);
                debug!(delivery = %evicted, "Evicted oldest delivery id");
            }
        }

        false
    }

    /// 当前记录的 id 数量
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for DeliveryDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}
