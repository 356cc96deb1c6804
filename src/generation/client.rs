use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{ContentGenerator, GenerationError, LessonRequest};

const SYSTEM_PROMPT: &str = "你是一位日語老師, 請用繁體中文解說。輸出必須包含三個段落標題: \
「關聯單字」、「重要片語」、「情境對話」。單字與片語逐條編號, 格式為 \
`1. 漢字(かな) - 中文意思`, 下一行寫 `例句：日文例句 - 中文翻譯`, 例句中的漢字同樣標注假名。";

/// OpenAI 兼容的 chat completions 接口
pub struct HttpGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl HttpGenerator {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

pub(crate) fn user_prompt(request: &LessonRequest) -> String {
    match request.level.as_deref() {
        Some(level) => format!("主題：{}\n程度：{}", request.topic.trim(), level.trim()),
        None => format!("主題：{}", request.topic.trim()),
    }
}

#[async_trait]
impl ContentGenerator for HttpGenerator {
    async fn generate(&self, request: &LessonRequest) -> Result<String, GenerationError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt(request) },
            ],
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await?;
        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}
