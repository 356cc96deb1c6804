use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::generation::{GenerationError, PipelineError};
use crate::rate_limit::RateLimitDecision;
use crate::synthesis::SynthesisError;
use crate::utils::{error_codes, error_to_api_response, error_with_data};

#[derive(Debug)]
pub enum AppError {
    Throttled(RateLimitDecision),
    BadRequest(String),
    Upstream(String),
    InternalServerError,
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Throttled(decision) => AppError::Throttled(decision),
            PipelineError::Generation(GenerationError::InvalidRequest(msg)) => {
                AppError::BadRequest(msg.to_string())
            }
            PipelineError::Generation(e) => {
                tracing::error!("Lesson generation failed: {}", e);
                AppError::Upstream("生成內容失敗".into())
            }
            PipelineError::RateLimit(e) => {
                tracing::error!("Rate limiter misconfigured: {}", e);
                AppError::InternalServerError
            }
        }
    }
}

impl From<SynthesisError> for AppError {
    fn from(e: SynthesisError) -> Self {
        match e {
            SynthesisError::EmptyText => AppError::BadRequest(e.to_string()),
            other => {
                tracing::error!("Speech synthesis failed: {}", other);
                AppError::Upstream("語音合成失敗".into())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Throttled(decision) => {
                let retry_after = decision.retry_after_seconds.unwrap_or(1);
                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    error_with_data(
                        error_codes::RATE_LIMIT,
                        format!("請求過於頻繁，請在{}秒後重試", retry_after),
                        decision,
                    ),
                )
                    .into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
                response
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                error_to_api_response::<()>(error_codes::VALIDATION_ERROR, msg),
            )
                .into_response(),
            AppError::Upstream(msg) => (
                StatusCode::BAD_GATEWAY,
                error_to_api_response::<()>(error_codes::UPSTREAM_ERROR, msg),
            )
                .into_response(),
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "內部伺服器錯誤".into()),
            )
                .into_response(),
        }
    }
}
