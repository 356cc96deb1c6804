use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::models::{RateLimitDecision, RateLimitEntry};

/// 限流计数存储
///
/// `update` 必须在同一临界区内完成读取与改写, 同一标识符的并发调用不能同时放行。
pub trait RateLimitStore: Send + Sync {
    /// 取出标识符当前的计数交给 `apply` 修改, 返回 `apply` 的判定结果。
    /// `apply` 结束后槽位为 `None` 表示删除该条目。
    fn update(
        &self,
        identifier: &str,
        apply: &mut dyn FnMut(&mut Option<RateLimitEntry>) -> RateLimitDecision,
    ) -> RateLimitDecision;

    /// 删除 `expired` 返回 true 的条目, 返回删除数量
    fn remove_where(&self, expired: &mut dyn FnMut(&RateLimitEntry) -> bool) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 进程内计数存储, 重启后清空
#[derive(Debug, Default)]
pub struct MemoryRateLimitStore {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, RateLimitEntry>> {
        // 计数数据在 panic 后仍然可用
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RateLimitStore for MemoryRateLimitStore {
    fn update(
        &self,
        identifier: &str,
        apply: &mut dyn FnMut(&mut Option<RateLimitEntry>) -> RateLimitDecision,
    ) -> RateLimitDecision {
        let mut entries = self.lock();
        let mut slot = entries.remove(identifier);
        let decision = apply(&mut slot);
        if let Some(entry) = slot {
            entries.insert(identifier.to_string(), entry);
        }
        decision
    }

    fn remove_where(&self, expired: &mut dyn FnMut(&RateLimitEntry) -> bool) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !expired(entry));
        before - entries.len()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}
