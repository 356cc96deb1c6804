// 限流模块
// 固定窗口计数, 计数只保存在进程内

pub mod clock;
pub mod limiter;
pub mod models;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use limiter::{RateLimitError, RateLimiter};
pub use models::{RateLimitDecision, RateLimitEntry, RateLimitPolicy};
pub use store::{MemoryRateLimitStore, RateLimitStore};
