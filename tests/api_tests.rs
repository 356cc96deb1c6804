use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use kotoba_backend::{
    AppState,
    cache::AudioCache,
    config::Config,
    content::ContentParser,
    generation::{ContentGenerator, GenerationError, LessonPipeline, LessonRequest},
    phonetic::PhoneticRuleset,
    rate_limit::{ManualClock, MemoryRateLimitStore, RateLimitPolicy, RateLimiter},
    routes::{audio::AUDIO_CACHE_HEADER, create_router},
    synthesis::{AudioService, SynthesisError, Synthesizer},
};
use serde_json::{Value, json};
use tower::ServiceExt; // for `oneshot`

const LESSON: &str = "\
## 關聯單字
1. 切符(きっぷ) - 車票
例句：切符(きっぷ)を買(か)います。 - 買車票。
2. 駅員(えきいん)

## 重要片語
1. 乗(の)り換(か)え - 轉乘

## 情境對話
A：東京(とうきょう)まで、いくらですか。
";

struct CannedGenerator;

#[async_trait]
impl ContentGenerator for CannedGenerator {
    async fn generate(&self, _request: &LessonRequest) -> Result<String, GenerationError> {
        Ok(LESSON.to_string())
    }
}

#[derive(Default)]
struct CountingSynthesizer {
    calls: AtomicUsize,
}

#[async_trait]
impl Synthesizer for CountingSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(text.as_bytes().to_vec())
    }
}

fn test_app(max_requests: u32, synthesizer: Arc<CountingSynthesizer>) -> Router {
    let limiter = RateLimiter::new(
        Arc::new(MemoryRateLimitStore::new()),
        Arc::new(ManualClock::new(1_700_000_000_000)),
    );
    let state = AppState {
        config: Config::default(),
        lessons: Arc::new(LessonPipeline::new(
            Arc::new(limiter),
            RateLimitPolicy::new(max_requests, Duration::from_secs(60)),
            Arc::new(CannedGenerator),
            ContentParser::default(),
        )),
        audio: Arc::new(AudioService::new(
            AudioCache::in_memory(),
            Arc::new(PhoneticRuleset::japanese_tts()),
            synthesizer,
        )),
    };
    create_router(state)
}

fn json_request(method: &str, uri: &str, body: Value) -> Result<Request<Body>, String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-user-id", "learner-1")
        .body(Body::from(body.to_string()))
        .map_err(|e| e.to_string())
}

async fn body_json(response: axum::response::Response) -> Result<Value, String> {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .map_err(|e| e.to_string())?;
    serde_json::from_slice(&bytes).map_err(|e| e.to_string())
}

#[tokio::test]
async fn ping_reports_ok() -> Result<(), String> {
    let app = test_app(10, Arc::default());
    let request = Request::builder()
        .uri("/api/ping")
        .body(Body::empty())
        .map_err(|e| e.to_string())?;

    let response = app.oneshot(request).await.map_err(|e| format!("{e:?}"))?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await?;
    assert_eq!(body["resp_data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn parse_endpoint_returns_entries_and_dialogue() -> Result<(), String> {
    let app = test_app(10, Arc::default());
    let request = json_request("POST", "/api/lessons/parse", json!({ "raw_text": LESSON }))?;

    let response = app.oneshot(request).await.map_err(|e| format!("{e:?}"))?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    let data = &body["resp_data"];
    assert_eq!(data["words"].as_array().map(Vec::len), Some(1));
    assert_eq!(data["words"][0]["surface_form"], "切符");
    assert_eq!(data["words"][0]["reading"], "きっぷ");
    assert_eq!(data["words"][0]["example"][0]["type"], "ruby");
    assert_eq!(data["phrases"][0]["reading"], "のりかえ");
    assert_eq!(data["dialogue"], "A：東京(とうきょう)まで、いくらですか。");
    assert_eq!(data["report"]["dropped"], 1);
    Ok(())
}

#[tokio::test]
async fn generation_is_throttled_per_user() -> Result<(), String> {
    let app = test_app(2, Arc::default());

    for expected_remaining in [1, 0] {
        let request = json_request("POST", "/api/lessons/generate", json!({ "topic": "車站" }))?;
        let response = app.clone().oneshot(request).await.map_err(|e| format!("{e:?}"))?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await?;
        assert_eq!(body["resp_data"]["remaining"], expected_remaining);
        assert_eq!(body["resp_data"]["words"][0]["meaning"], "車票");
    }

    let request = json_request("POST", "/api/lessons/generate", json!({ "topic": "車站" }))?;
    let response = app.clone().oneshot(request).await.map_err(|e| format!("{e:?}"))?;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response.headers().get(header::RETRY_AFTER).and_then(|v| v.to_str().ok()),
        Some("60")
    );
    let body = body_json(response).await?;
    assert_eq!(body["code"], 1005);
    assert_eq!(body["resp_data"]["allowed"], false);
    assert_eq!(body["resp_data"]["retry_after_seconds"], 60);

    // 其他用户不受影响
    let request = Request::builder()
        .method("POST")
        .uri("/api/lessons/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-user-id", "learner-2")
        .body(Body::from(json!({ "topic": "車站" }).to_string()))
        .map_err(|e| e.to_string())?;
    let response = app.oneshot(request).await.map_err(|e| format!("{e:?}"))?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn blank_topic_is_a_bad_request() -> Result<(), String> {
    let app = test_app(10, Arc::default());
    let request = json_request("POST", "/api/lessons/generate", json!({ "topic": "" }))?;
    let response = app.oneshot(request).await.map_err(|e| format!("{e:?}"))?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn audio_is_synthesized_once_and_then_cached() -> Result<(), String> {
    let synthesizer = Arc::new(CountingSynthesizer::default());
    let app = test_app(10, synthesizer.clone());

    for expected in ["miss", "hit"] {
        let request = json_request("POST", "/api/audio", json!({ "text": "きょう" }))?;
        let response = app.clone().oneshot(request).await.map_err(|e| format!("{e:?}"))?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(AUDIO_CACHE_HEADER).and_then(|v| v.to_str().ok()),
            Some(expected)
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("audio/mpeg")
        );
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| e.to_string())?;
        // 合成器收到的是修正后的文本
        assert_eq!(bytes.as_ref(), "キ\u{3000}ョー".as_bytes());
    }
    assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 1);

    let request = Request::builder()
        .uri("/api/audio/cache")
        .body(Body::empty())
        .map_err(|e| e.to_string())?;
    let response = app.clone().oneshot(request).await.map_err(|e| format!("{e:?}"))?;
    let body = body_json(response).await?;
    assert_eq!(body["resp_data"]["count"], 1);
    assert_eq!(body["resp_data"]["backend"], "memory");

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/audio/cache")
        .body(Body::empty())
        .map_err(|e| e.to_string())?;
    let response = app.oneshot(request).await.map_err(|e| format!("{e:?}"))?;
    let body = body_json(response).await?;
    assert_eq!(body["resp_data"]["count"], 0);
    Ok(())
}

#[tokio::test]
async fn blank_audio_text_is_rejected() -> Result<(), String> {
    let synthesizer = Arc::new(CountingSynthesizer::default());
    let app = test_app(10, synthesizer.clone());
    let request = json_request("POST", "/api/audio", json!({ "text": " " }))?;
    let response = app.oneshot(request).await.map_err(|e| format!("{e:?}"))?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 0);
    Ok(())
}
