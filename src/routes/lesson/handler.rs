use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::model::{ParseLessonRequest, ParseLessonResponse};
use crate::AppState;
use crate::error::AppError;
use crate::generation::LessonRequest;
use crate::middleware::ClientIdentity;
use crate::utils::success_to_api_response;

#[axum::debug_handler]
pub async fn generate_lesson(
    State(state): State<AppState>,
    identity: ClientIdentity,
    Json(req): Json<LessonRequest>,
) -> Result<impl IntoResponse, AppError> {
    let lesson = state.lessons.generate(identity.as_str(), &req).await?;
    Ok((StatusCode::OK, success_to_api_response(lesson)))
}

#[axum::debug_handler]
pub async fn parse_lesson(
    State(state): State<AppState>,
    Json(req): Json<ParseLessonRequest>,
) -> impl IntoResponse {
    let parser = state.lessons.parser();
    let (content, report) = parser.parse_with_report(&req.raw_text);

    (
        StatusCode::OK,
        success_to_api_response(ParseLessonResponse {
            words: content.words,
            phrases: content.phrases,
            dialogue: parser.filter_residual(&req.raw_text),
            report,
        }),
    )
}
