pub mod audio;
pub mod lesson;
pub mod ping;

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use crate::AppState;
use crate::middleware::log_errors;

/// 创建主路由, 所有接口挂在 `api_base_uri` 下
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/ping", get(ping::ping))
        // 学习内容
        .route("/lessons/generate", post(lesson::generate_lesson))
        .route("/lessons/parse", post(lesson::parse_lesson))
        // 语音
        .route("/audio", post(audio::speak))
        .route(
            "/audio/cache",
            get(audio::cache_stats).delete(audio::clear_cache),
        );

    // axum 不允许在根路径 nest
    let base = state.config.api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        api
    } else {
        Router::new().nest(base, api)
    };

    let router = router.layer(ServiceBuilder::new().layer(axum::middleware::from_fn(log_errors)));

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    router.with_state(state)
}
