use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("audio store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Redis(#[from] redis::RedisError),
}

/// 音频存储后端
///
/// 键为内容摘要, 同一个键重复写入时以最后一次为准。
#[async_trait]
pub trait AudioStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn put(&self, key: &str, audio: &[u8]) -> Result<(), CacheError>;

    async fn clear(&self) -> Result<(), CacheError>;

    async fn count(&self) -> Result<usize, CacheError>;

    /// 后端名称(日志与统计用)
    fn name(&self) -> &'static str;
}

/// 进程内音频存储
#[derive(Debug, Default)]
pub struct MemoryAudioStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryAudioStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AudioStore for MemoryAudioStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, audio: &[u8]) -> Result<(), CacheError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), audio.to_vec());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.entries.write().await.clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize, CacheError> {
        Ok(self.entries.read().await.len())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
