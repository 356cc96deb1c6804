use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub backend: &'static str,
    pub count: usize,
}
