// 缓存模块
// 合成音频按文本摘要缓存, 后端可以是内存或 Redis

pub mod audio;
pub mod keys;
pub mod redis_store;
pub mod store;

pub use audio::AudioCache;
pub use keys::audio_content_key;
pub use redis_store::RedisAudioStore;
pub use store::{AudioStore, CacheError, MemoryAudioStore};
