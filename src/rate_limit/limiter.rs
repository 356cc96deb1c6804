use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::clock::{Clock, SystemClock};
use super::models::{RateLimitDecision, RateLimitEntry, RateLimitPolicy};
use super::store::{MemoryRateLimitStore, RateLimitStore};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("invalid rate limit argument: {0}")]
    InvalidArgument(&'static str),
}

/// 固定窗口限流器
///
/// 计数保存在注入的 [`RateLimitStore`] 中, 由本实例独占。
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryRateLimitStore::new()), Arc::new(SystemClock))
    }

    /// 检查并消耗一次请求额度
    ///
    /// 窗口已过期或不存在时开启新窗口; 额度用尽时拒绝且不增加计数。
    pub fn check_and_consume(
        &self,
        identifier: &str,
        max_requests: u32,
        window: Duration,
    ) -> Result<RateLimitDecision, RateLimitError> {
        if max_requests == 0 {
            return Err(RateLimitError::InvalidArgument("max_requests must be positive"));
        }
        if window.is_zero() {
            return Err(RateLimitError::InvalidArgument("window must be positive"));
        }
        let window_ms = i64::try_from(window.as_millis())
            .map_err(|_| RateLimitError::InvalidArgument("window is too large"))?;

        let now = self.clock.now_ms();
        let decision = self.store.update(
            identifier,
            &mut |slot: &mut Option<RateLimitEntry>| match slot {
                Some(entry) if !entry.is_expired(now) => {
                    if entry.count >= max_requests {
                        RateLimitDecision::denied(entry.window_reset_at, now)
                    } else {
                        entry.count += 1;
                        RateLimitDecision::admitted(max_requests - entry.count, entry.window_reset_at)
                    }
                }
                _ => {
                    let entry = RateLimitEntry::open(identifier, now, window_ms);
                    let decision = RateLimitDecision::admitted(max_requests - 1, entry.window_reset_at);
                    *slot = Some(entry);
                    decision
                }
            },
        );

        if !decision.allowed {
            tracing::info!(
                "rate limited: {} retry after {:?}s",
                identifier,
                decision.retry_after_seconds
            );
        }
        Ok(decision)
    }

    pub fn check(
        &self,
        identifier: &str,
        policy: &RateLimitPolicy,
    ) -> Result<RateLimitDecision, RateLimitError> {
        self.check_and_consume(identifier, policy.max_requests, policy.window)
    }

    /// 清理已过期的窗口, 仅用于控制内存
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let removed = self.store.remove_where(&mut |entry| entry.is_expired(now));
        if removed > 0 {
            tracing::debug!("swept {} expired rate limit entries", removed);
        }
        removed
    }

    pub fn tracked_identifiers(&self) -> usize {
        self.store.len()
    }

    /// 后台定期清理
    pub fn spawn_sweeper(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // 第一次 tick 立即返回
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.sweep_expired();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::clock::ManualClock;

    const WINDOW: Duration = Duration::from_millis(60_000);

    fn limiter_at(start_ms: i64) -> (RateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start_ms));
        let limiter = RateLimiter::new(Arc::new(MemoryRateLimitStore::new()), clock.clone());
        (limiter, clock)
    }

    #[test]
    fn admits_exactly_max_requests_per_window() {
        let (limiter, _clock) = limiter_at(1_000_000);

        for expected_remaining in (0..10).rev() {
            let decision = limiter.check_and_consume("user-1", 10, WINDOW).unwrap();
            assert!(decision.allowed);
            assert_eq!(decision.remaining, expected_remaining);
            assert_eq!(decision.reset_at, 1_060_000);
            assert_eq!(decision.retry_after_seconds, None);
        }

        let denied = limiter.check_and_consume("user-1", 10, WINDOW).unwrap();
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.retry_after_seconds, Some(60));
    }

    #[test]
    fn denial_does_not_consume() {
        let (limiter, clock) = limiter_at(0);
        limiter.check_and_consume("ip:1.2.3.4", 1, WINDOW).unwrap();
        for _ in 0..5 {
            assert!(!limiter.check_and_consume("ip:1.2.3.4", 1, WINDOW).unwrap().allowed);
        }

        clock.advance(Duration::from_millis(59_001));
        let denied = limiter.check_and_consume("ip:1.2.3.4", 1, WINDOW).unwrap();
        assert_eq!(denied.retry_after_seconds, Some(1));
    }

    #[test]
    fn window_resets_after_duration() {
        let (limiter, clock) = limiter_at(0);
        for _ in 0..3 {
            limiter.check_and_consume("user-1", 3, WINDOW).unwrap();
        }
        assert!(!limiter.check_and_consume("user-1", 3, WINDOW).unwrap().allowed);

        clock.advance(WINDOW);
        let decision = limiter.check_and_consume("user-1", 3, WINDOW).unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 2);
        assert_eq!(decision.reset_at, 120_000);
    }

    #[test]
    fn identifiers_are_counted_separately() {
        let (limiter, _clock) = limiter_at(0);
        assert!(limiter.check_and_consume("a", 1, WINDOW).unwrap().allowed);
        assert!(!limiter.check_and_consume("a", 1, WINDOW).unwrap().allowed);
        assert!(limiter.check_and_consume("b", 1, WINDOW).unwrap().allowed);
    }

    #[test]
    fn rejects_invalid_arguments() {
        let (limiter, _clock) = limiter_at(0);
        assert!(matches!(
            limiter.check_and_consume("a", 0, WINDOW),
            Err(RateLimitError::InvalidArgument(_))
        ));
        assert!(matches!(
            limiter.check_and_consume("a", 10, Duration::ZERO),
            Err(RateLimitError::InvalidArgument(_))
        ));
        assert_eq!(limiter.tracked_identifiers(), 0);
    }

    #[test]
    fn sweep_removes_only_expired_windows() {
        let (limiter, clock) = limiter_at(0);
        limiter.check_and_consume("old", 5, Duration::from_secs(10)).unwrap();
        limiter.check_and_consume("fresh", 5, Duration::from_secs(120)).unwrap();

        clock.advance(Duration::from_secs(30));
        assert_eq!(limiter.sweep_expired(), 1);
        assert_eq!(limiter.tracked_identifiers(), 1);

        // 过期条目即使未清理也视为不存在
        let decision = limiter.check_and_consume("fresh", 5, Duration::from_secs(120)).unwrap();
        assert_eq!(decision.remaining, 3);
    }

    #[test]
    fn concurrent_calls_never_over_admit() {
        let (limiter, _clock) = limiter_at(0);
        let limiter = Arc::new(limiter);

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || {
                    limiter.check_and_consume("shared", 10, WINDOW).unwrap().allowed
                })
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|allowed| *allowed)
            .count();
        assert_eq!(admitted, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_cleans_up_in_background() {
        let (limiter, clock) = limiter_at(0);
        let limiter = Arc::new(limiter);
        limiter.check_and_consume("a", 5, Duration::from_secs(1)).unwrap();
        clock.advance(Duration::from_secs(2));

        let handle = limiter.clone().spawn_sweeper(Duration::from_secs(300));
        tokio::time::sleep(Duration::from_secs(301)).await;
        assert_eq!(limiter.tracked_identifiers(), 0);
        handle.abort();
    }
}
