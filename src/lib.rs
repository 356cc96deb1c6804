use std::sync::Arc;

use config::Config;
use generation::LessonPipeline;
use synthesis::AudioService;

pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod generation;
pub mod middleware;
pub mod phonetic;
pub mod rate_limit;
pub mod routes;
pub mod synthesis;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub lessons: Arc<LessonPipeline>,
    pub audio: Arc<AudioService>,
}
