use std::sync::Arc;

use super::keys::audio_content_key;
use super::store::{AudioStore, MemoryAudioStore};

/// 按内容寻址的音频缓存
///
/// 键由调用方给出的原始文本计算, 与发音修正后的文本无关。后端出错时
/// 读取按未命中处理、写入直接忽略, 只记录日志, 调用方总能退回到重新合成。
#[derive(Clone)]
pub struct AudioCache {
    store: Arc<dyn AudioStore>,
}

impl AudioCache {
    pub fn new(store: Arc<dyn AudioStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryAudioStore::new()))
    }

    pub fn backend(&self) -> &'static str {
        self.store.name()
    }

    pub async fn get(&self, text: &str) -> Option<Vec<u8>> {
        let key = audio_content_key(text);
        match self.store.get(&key).await {
            Ok(audio) => audio,
            Err(e) => {
                tracing::warn!("Audio cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    pub async fn put(&self, text: &str, audio: &[u8]) {
        let key = audio_content_key(text);
        if let Err(e) = self.store.put(&key, audio).await {
            tracing::warn!("Audio cache write failed for {}: {}", key, e);
        }
    }

    /// 清空缓存, 仅用于维护
    pub async fn clear(&self) {
        match self.store.clear().await {
            Ok(()) => tracing::info!("Audio cache cleared ({})", self.store.name()),
            Err(e) => tracing::warn!("Audio cache clear failed: {}", e),
        }
    }

    pub async fn count(&self) -> usize {
        self.store.count().await.unwrap_or_else(|e| {
            tracing::warn!("Audio cache count failed: {}", e);
            0
        })
    }
}
