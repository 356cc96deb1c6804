//! 学习内容生成
//!
//! 生成请求先经过限流, 放行后调用生成服务, 再把返回的文本解析成单字、片语与对话。

pub mod client;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::content::{ContentParser, VocabularyEntry};
use crate::rate_limit::{RateLimitDecision, RateLimitError, RateLimitPolicy, RateLimiter};

pub use client::HttpGenerator;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("invalid lesson request: {0}")]
    InvalidRequest(&'static str),
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("generation provider returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("generation provider returned no content")]
    EmptyResponse,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("too many requests, retry after {:?}s", .0.retry_after_seconds)]
    Throttled(RateLimitDecision),
    #[error(transparent)]
    RateLimit(#[from] RateLimitError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonRequest {
    pub topic: String,
    #[serde(default)]
    pub level: Option<String>,
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// 返回带分区标题与注音的原始文本
    async fn generate(&self, request: &LessonRequest) -> Result<String, GenerationError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedLesson {
    pub words: Vec<VocabularyEntry>,
    pub phrases: Vec<VocabularyEntry>,
    pub dialogue: String,
    pub remaining: u32,
}

pub struct LessonPipeline {
    limiter: Arc<RateLimiter>,
    policy: RateLimitPolicy,
    generator: Arc<dyn ContentGenerator>,
    parser: ContentParser,
}

impl LessonPipeline {
    pub fn new(
        limiter: Arc<RateLimiter>,
        policy: RateLimitPolicy,
        generator: Arc<dyn ContentGenerator>,
        parser: ContentParser,
    ) -> Self {
        Self {
            limiter,
            policy,
            generator,
            parser,
        }
    }

    pub fn parser(&self) -> &ContentParser {
        &self.parser
    }

    pub async fn generate(
        &self,
        identifier: &str,
        request: &LessonRequest,
    ) -> Result<GeneratedLesson, PipelineError> {
        if request.topic.trim().is_empty() {
            return Err(GenerationError::InvalidRequest("topic must not be empty").into());
        }

        let decision = self.limiter.check(identifier, &self.policy)?;
        if !decision.allowed {
            return Err(PipelineError::Throttled(decision));
        }

        let raw = self.generator.generate(request).await?;
        let (content, report) = self.parser.parse_with_report(&raw);
        tracing::info!(
            "Generated lesson for {}: {} words, {} phrases, {} dropped",
            identifier,
            content.words.len(),
            content.phrases.len(),
            report.dropped
        );

        Ok(GeneratedLesson {
            words: content.words,
            phrases: content.phrases,
            dialogue: self.parser.filter_residual(&raw),
            remaining: decision.remaining,
        })
    }
}
