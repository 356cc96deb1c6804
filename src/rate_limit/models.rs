use std::time::Duration;

use serde::Serialize;

/// 单个标识符在当前窗口内的计数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub identifier: String,
    pub count: u32,
    pub window_reset_at: i64, // Unix timestamp, 毫秒
}

impl RateLimitEntry {
    /// 新窗口的第一次请求
    pub fn open(identifier: &str, now_ms: i64, window_ms: i64) -> Self {
        Self {
            identifier: identifier.to_string(),
            count: 1,
            window_reset_at: now_ms.saturating_add(window_ms),
        }
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.window_reset_at <= now_ms
    }
}

/// 限流判定结果
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
}

impl RateLimitDecision {
    pub fn admitted(remaining: u32, reset_at: i64) -> Self {
        Self {
            allowed: true,
            remaining,
            reset_at,
            retry_after_seconds: None,
        }
    }

    pub fn denied(reset_at: i64, now_ms: i64) -> Self {
        let wait_ms = reset_at.saturating_sub(now_ms).max(0) as u64;
        Self {
            allowed: false,
            remaining: 0,
            reset_at,
            retry_after_seconds: Some(wait_ms.div_ceil(1000)),
        }
    }
}

/// 每个窗口允许的请求数与窗口长度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

impl Default for RateLimitPolicy {
    // 生成接口: 每分钟 10 次
    fn default() -> Self {
        Self::new(10, Duration::from_millis(60_000))
    }
}
