use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use kotoba_backend::{
    AppState,
    cache::{AudioCache, AudioStore, MemoryAudioStore, RedisAudioStore},
    config::Config,
    content::ContentParser,
    generation::{HttpGenerator, LessonPipeline},
    phonetic::PhoneticRuleset,
    rate_limit::RateLimiter,
    routes,
    synthesis::{AudioService, HttpSynthesizer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 音频缓存后端
    let store: Arc<dyn AudioStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisAudioStore::open(url).expect("Invalid REDIS_URL")),
        None => {
            tracing::info!("REDIS_URL not set, using in-memory audio cache");
            Arc::new(MemoryAudioStore::new())
        }
    };

    // 发音修正规则
    let rules = match &config.phonetic_rules_path {
        Some(path) => PhoneticRuleset::from_file(path).expect("Failed to load phonetic rules"),
        None => PhoneticRuleset::japanese_tts(),
    };
    tracing::info!("Loaded {} phonetic rules", rules.rule_count());

    // 设置限流器并定期清理过期窗口
    let limiter = Arc::new(RateLimiter::in_memory());
    limiter
        .clone()
        .spawn_sweeper(config.rate_limit_sweep_interval());

    let generator = Arc::new(HttpGenerator::new(
        config.llm_api_url.clone(),
        config.llm_api_key.clone(),
        config.llm_model.clone(),
    ));
    let synthesizer = Arc::new(HttpSynthesizer::new(
        config.tts_api_url.clone(),
        config.tts_api_key.clone(),
        config.tts_voice.clone(),
        config.tts_language_code.clone(),
    ));

    // 设置应用状态
    let state = AppState {
        config: config.clone(),
        lessons: Arc::new(LessonPipeline::new(
            limiter,
            config.generation_policy(),
            generator,
            ContentParser::default(),
        )),
        audio: Arc::new(AudioService::new(
            AudioCache::new(store),
            Arc::new(rules),
            synthesizer,
        )),
    };

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    let app = routes::create_router(state);

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
