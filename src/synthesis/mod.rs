//! 语音合成
//!
//! [`AudioService`] 串起缓存与合成: 先按原文查缓存, 未命中时对文本做发音修正后
//! 交给 [`Synthesizer`], 再按原文写回缓存。

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::cache::AudioCache;
use crate::phonetic::PhoneticRuleset;

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("text to synthesize is empty")]
    EmptyText,
    #[error("speech request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("speech provider returned {status}: {body}")]
    Upstream { status: u16, body: String },
}

#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// 返回合成后的音频(MP3)
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError>;
}

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    voice: &'a str,
    language_code: &'a str,
}

/// HTTP 语音合成服务
pub struct HttpSynthesizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    voice: String,
    language_code: String,
}

impl HttpSynthesizer {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        voice: impl Into<String>,
        language_code: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
            voice: voice.into(),
            language_code: language_code.into(),
        }
    }
}

#[async_trait]
impl Synthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError> {
        let mut request = self.client.post(&self.endpoint).json(&SynthesisRequest {
            text,
            voice: &self.voice,
            language_code: &self.language_code,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioSource {
    Cache,
    Synthesized,
}

impl AudioSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioSource::Cache => "hit",
            AudioSource::Synthesized => "miss",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpokenAudio {
    pub audio: Vec<u8>,
    pub source: AudioSource,
}

#[derive(Clone)]
pub struct AudioService {
    cache: AudioCache,
    rules: Arc<PhoneticRuleset>,
    synthesizer: Arc<dyn Synthesizer>,
}

impl AudioService {
    pub fn new(
        cache: AudioCache,
        rules: Arc<PhoneticRuleset>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        Self {
            cache,
            rules,
            synthesizer,
        }
    }

    pub fn cache(&self) -> &AudioCache {
        &self.cache
    }

    pub async fn speak(&self, text: &str) -> Result<SpokenAudio, SynthesisError> {
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        if let Some(audio) = self.cache.get(text).await {
            tracing::debug!("Audio cache hit ({} bytes)", audio.len());
            return Ok(SpokenAudio {
                audio,
                source: AudioSource::Cache,
            });
        }

        let corrected = self.rules.preprocess(text);
        let audio = self.synthesizer.synthesize(&corrected).await?;
        self.cache.put(text, &audio).await;

        Ok(SpokenAudio {
            audio,
            source: AudioSource::Synthesized,
        })
    }
}
