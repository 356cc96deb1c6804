use std::future::Future;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client as RedisClient, RedisResult};
use tokio::sync::Mutex;

use super::keys::{audio_key_pattern, audio_storage_key};
use super::store::{AudioStore, CacheError};

/// Redis 音频存储
///
/// 第一次访问时才建立连接, 之后复用同一个多路复用连接。
/// 命令失败后丢弃该连接, 下一次访问重新连接。
pub struct RedisAudioStore {
    client: RedisClient,
    connection: Mutex<Option<MultiplexedConnection>>,
}

impl RedisAudioStore {
    pub fn new(client: RedisClient) -> Self {
        Self {
            client,
            connection: Mutex::new(None),
        }
    }

    pub fn open(redis_url: &str) -> Result<Self, CacheError> {
        Ok(Self::new(RedisClient::open(redis_url)?))
    }

    async fn connection(&self) -> Result<MultiplexedConnection, CacheError> {
        let mut slot = self.connection.lock().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }
        tracing::debug!("Opening redis connection for audio cache");
        let conn = self.client.get_multiplexed_async_connection().await?;
        *slot = Some(conn.clone());
        Ok(conn)
    }

    async fn run<T, F, Fut>(&self, command: F) -> Result<T, CacheError>
    where
        F: FnOnce(MultiplexedConnection) -> Fut,
        Fut: Future<Output = RedisResult<T>>,
    {
        let conn = self.connection().await?;
        match command(conn).await {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::debug!("Dropping redis connection after error: {}", err);
                *self.connection.lock().await = None;
                Err(err.into())
            }
        }
    }

    async fn stored_keys(&self) -> Result<Vec<String>, CacheError> {
        self.run(|mut conn| async move { conn.keys(audio_key_pattern()).await })
            .await
    }
}

#[async_trait]
impl AudioStore for RedisAudioStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let storage_key = audio_storage_key(key);
        self.run(|mut conn| async move { conn.get(storage_key).await })
            .await
    }

    async fn put(&self, key: &str, audio: &[u8]) -> Result<(), CacheError> {
        let storage_key = audio_storage_key(key);
        self.run(|mut conn| async move { conn.set::<_, _, ()>(storage_key, audio).await })
            .await
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let keys = self.stored_keys().await?;
        if keys.is_empty() {
            return Ok(());
        }
        self.run(|mut conn| async move { conn.del::<_, ()>(keys).await })
            .await
    }

    async fn count(&self) -> Result<usize, CacheError> {
        Ok(self.stored_keys().await?.len())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
