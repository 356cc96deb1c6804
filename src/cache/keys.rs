use sha2::{Digest, Sha256};

/// 音频缓存键前缀, 带存储格式版本
pub const AUDIO_KEY_PREFIX: &str = "audio:v1:";

/// 音频内容键: 原始文本 UTF-8 字节的 SHA-256 十六进制摘要
pub fn audio_content_key(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Redis 中的完整键
pub fn audio_storage_key(content_key: &str) -> String {
    format!("{}{}", AUDIO_KEY_PREFIX, content_key)
}

/// 匹配所有音频缓存键
pub fn audio_key_pattern() -> String {
    format!("{}*", AUDIO_KEY_PREFIX)
}
