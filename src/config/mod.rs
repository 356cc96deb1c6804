use std::env;
use std::time::Duration;

use crate::rate_limit::RateLimitPolicy;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid {
        name: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub rate_limit_requests: u32,
    pub rate_limit_window_ms: u64,
    pub rate_limit_sweep_secs: u64,
    /// 未配置时使用进程内音频缓存
    pub redis_url: Option<String>,
    /// 语音合成前的发音修正规则文件(JSON)
    pub phonetic_rules_path: Option<String>,
    pub llm_api_url: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub tts_api_url: String,
    pub tts_api_key: Option<String>,
    pub tts_voice: String,
    pub tts_language_code: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_host: "0.0.0.0".into(),
            server_port: 3000,
            api_base_uri: "/api".into(),
            rate_limit_requests: 10,
            rate_limit_window_ms: 60_000,
            rate_limit_sweep_secs: 300,
            redis_url: None,
            phonetic_rules_path: None,
            llm_api_url: "http://localhost:8080/v1/chat/completions".into(),
            llm_api_key: String::new(),
            llm_model: "gpt-4o-mini".into(),
            tts_api_url: "http://localhost:8081/synthesize".into(),
            tts_api_key: None,
            tts_voice: "ja-JP-Neural2-B".into(),
            tts_language_code: "ja-JP".into(),
        }
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let defaults = Config::default();
        let config = Config {
            server_host: optional("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: optional("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            api_base_uri: optional("API_BASE_URI").unwrap_or(defaults.api_base_uri),
            rate_limit_requests: optional("RATE_LIMIT_REQUESTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rate_limit_requests),
            rate_limit_window_ms: optional("RATE_LIMIT_WINDOW_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rate_limit_window_ms),
            rate_limit_sweep_secs: optional("RATE_LIMIT_SWEEP_INTERVAL")
                .and_then(|v| v.trim_end_matches('s').parse().ok())
                .unwrap_or(defaults.rate_limit_sweep_secs),
            redis_url: optional("REDIS_URL"),
            phonetic_rules_path: optional("PHONETIC_RULES_PATH"),
            llm_api_url: required("LLM_API_URL")?,
            llm_api_key: required("LLM_API_KEY")?,
            llm_model: optional("LLM_MODEL").unwrap_or(defaults.llm_model),
            tts_api_url: required("TTS_API_URL")?,
            tts_api_key: optional("TTS_API_KEY"),
            tts_voice: optional("TTS_VOICE").unwrap_or(defaults.tts_voice),
            tts_language_code: optional("TTS_LANGUAGE_CODE")
                .unwrap_or(defaults.tts_language_code),
        };
        config.validate()?;
        Ok(config)
    }

    /// 限流参数为 0 时每次生成请求都会失败, 启动时直接拒绝
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit_requests == 0 {
            return Err(ConfigError::Invalid {
                name: "RATE_LIMIT_REQUESTS",
                reason: "must be greater than zero",
            });
        }
        if self.rate_limit_window_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "RATE_LIMIT_WINDOW_MS",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_millis(self.rate_limit_window_ms)
    }

    pub fn rate_limit_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_sweep_secs.max(1))
    }

    /// 生成请求的限流策略
    pub fn generation_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(self.rate_limit_requests, self.rate_limit_window())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
        let policy = Config::default().generation_policy();
        assert_eq!(policy.max_requests, 10);
        assert_eq!(policy.window, Duration::from_secs(60));
    }

    #[test]
    fn zero_request_limit_is_rejected() {
        let config = Config {
            rate_limit_requests: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { name: "RATE_LIMIT_REQUESTS", .. })
        ));
    }

    #[test]
    fn zero_window_is_rejected() {
        let config = Config {
            rate_limit_window_ms: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { name: "RATE_LIMIT_WINDOW_MS", .. })
        ));
    }
}
