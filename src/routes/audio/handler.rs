use axum::{
    extract::{Json, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use super::model::{CacheStatsResponse, SpeakRequest};
use crate::AppState;
use crate::error::AppError;
use crate::utils::success_to_api_response;

pub const AUDIO_CACHE_HEADER: &str = "x-audio-cache";

#[axum::debug_handler]
pub async fn speak(
    State(state): State<AppState>,
    Json(req): Json<SpeakRequest>,
) -> Result<impl IntoResponse, AppError> {
    let spoken = state.audio.speak(&req.text).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (header::HeaderName::from_static(AUDIO_CACHE_HEADER), spoken.source.as_str()),
        ],
        spoken.audio,
    ))
}

pub async fn cache_stats(State(state): State<AppState>) -> impl IntoResponse {
    let cache = state.audio.cache();
    (
        StatusCode::OK,
        success_to_api_response(CacheStatsResponse {
            backend: cache.backend(),
            count: cache.count().await,
        }),
    )
}

pub async fn clear_cache(State(state): State<AppState>) -> impl IntoResponse {
    let cache = state.audio.cache();
    cache.clear().await;
    (
        StatusCode::OK,
        success_to_api_response(CacheStatsResponse {
            backend: cache.backend(),
            count: cache.count().await,
        }),
    )
}
