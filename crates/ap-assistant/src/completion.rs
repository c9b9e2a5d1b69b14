//! Fallback responder: chat completion for queries the inventory can't answer.
//!
//! Calls an OpenAI-compatible `/v1/chat/completions` endpoint with a short
//! system prompt, the user's recent turns and the current query.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use ap_protocol::{ChatRole, Turn};

use crate::error::{CompletionError, CompletionResult};

const SYSTEM_PROMPT: &str = "Ты консультант автосалона в Telegram. Отвечай коротко и только по \
запросу клиента. Заканчивай ответ наводящим вопросом, который помогает сузить выбор автомобиля. \
Если клиент сомневается или не может определиться, предложи связаться с менеджером прямо здесь, \
в Telegram.";

/// Produces a free-form reply when no inventory record matched.
#[async_trait]
pub trait FallbackResponder: Send + Sync {
    /// Reply to `query` given the user's earlier turns (oldest first).
    async fn complete(&self, query: &str, history: &[Turn]) -> CompletionResult<String>;

    /// Short label for logs.
    fn responder_name(&self) -> &str;
}

/// Configuration for the chat completion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    /// API base URL; overridden in tests.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Whether fallback completion is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Bearer token. Read from `OPENAI_API_KEY`, never from the config file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "https://api.openai.com".into()
}
fn default_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_tokens() -> u32 {
    300
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_enabled() -> bool {
    true
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            enabled: default_enabled(),
            api_key: None,
        }
    }
}

/// Chat completions request body.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completions response (only fields we need).
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct ChatCompletionResponder {
    client: reqwest::Client,
    config: CompletionConfig,
}

impl ChatCompletionResponder {
    pub fn new(config: CompletionConfig) -> CompletionResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CompletionError::Config(format!("http client: {e}")))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl FallbackResponder for ChatCompletionResponder {
    async fn complete(&self, query: &str, history: &[Turn]) -> CompletionResult<String> {
        if !self.config.enabled {
            return Err(CompletionError::Disabled);
        }

        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage {
            role: ChatRole::System.as_str(),
            content: SYSTEM_PROMPT,
        });
        messages.extend(history.iter().map(|turn| ChatMessage {
            role: turn.role.as_str(),
            content: &turn.content,
        }));
        messages.push(ChatMessage {
            role: ChatRole::User.as_str(),
            content: query,
        });

        let body = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CompletionError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::Unavailable(format!(
                "completion api returned {status}"
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Malformed(e.to_string()))?;

        let reply = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| CompletionError::Malformed("no completion content".into()))?;

        tracing::debug!(
            model = %self.config.model,
            history_len = history.len(),
            reply_len = reply.len(),
            "completion received"
        );
        Ok(reply)
    }

    fn responder_name(&self) -> &str {
        "chat-completions"
    }
}

/// Scripted responder for tests and offline runs.
///
/// Returns the configured reply (or fails when built with
/// [`MockResponder::failing`]) and records every call's history.
pub struct MockResponder {
    reply: Option<String>,
    calls: Mutex<Vec<(String, Vec<Turn>)>>,
}

impl MockResponder {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(query, history)` of every call so far.
    pub async fn calls(&self) -> Vec<(String, Vec<Turn>)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl FallbackResponder for MockResponder {
    async fn complete(&self, query: &str, history: &[Turn]) -> CompletionResult<String> {
        self.calls
            .lock()
            .await
            .push((query.to_string(), history.to_vec()));
        self.reply
            .clone()
            .ok_or_else(|| CompletionError::Unavailable("mock responder offline".into()))
    }

    fn responder_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Helper: build a chat completions response body.
    fn completion_response(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    fn responder_for(server: &MockServer) -> ChatCompletionResponder {
        ChatCompletionResponder::new(CompletionConfig {
            base_url: server.uri(),
            timeout_secs: 2,
            api_key: Some("sk-test".into()),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn complete_sends_history_and_returns_trimmed_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "max_tokens": 300,
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": "нужен семейный автомобиль"},
                    {"role": "assistant", "content": "Какой бюджет?"},
                    {"role": "user", "content": "до 2 млн"}
                ]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_response("  Посмотрите Skoda Octavia. Какой кузов?  ")),
            )
            .mount(&server)
            .await;

        let history = vec![
            Turn::user("нужен семейный автомобиль"),
            Turn::assistant("Какой бюджет?"),
        ];
        let reply = responder_for(&server)
            .complete("до 2 млн", &history)
            .await
            .unwrap();
        assert_eq!(reply, "Посмотрите Skoda Octavia. Какой кузов?");
    }

    #[tokio::test]
    async fn server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = responder_for(&server).complete("привет", &[]).await.unwrap_err();
        assert!(matches!(err, CompletionError::Unavailable(_)));
    }

    #[tokio::test]
    async fn empty_choices_are_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let err = responder_for(&server).complete("привет", &[]).await.unwrap_err();
        assert!(matches!(err, CompletionError::Malformed(_)));
    }

    #[tokio::test]
    async fn timeout_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_response("late"))
                    .set_delay(Duration::from_secs(10)),
            )
            .mount(&server)
            .await;

        // Client timeout is 2s, mock delays 10s
        let err = responder_for(&server).complete("привет", &[]).await.unwrap_err();
        assert!(matches!(err, CompletionError::Unavailable(_)));
    }

    #[tokio::test]
    async fn disabled_responder_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_response("hi")))
            .expect(0)
            .mount(&server)
            .await;

        let responder = ChatCompletionResponder::new(CompletionConfig {
            base_url: server.uri(),
            enabled: false,
            ..Default::default()
        })
        .unwrap();
        let err = responder.complete("привет", &[]).await.unwrap_err();
        assert!(matches!(err, CompletionError::Disabled));
    }

    #[tokio::test]
    async fn mock_records_calls() {
        let mock = MockResponder::replying("ok");
        mock.complete("a", &[Turn::user("b")]).await.unwrap();
        let calls = mock.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "a");
        assert_eq!(calls[0].1, vec![Turn::user("b")]);

        assert!(MockResponder::failing().complete("a", &[]).await.is_err());
    }

    #[test]
    fn config_defaults() {
        let config = CompletionConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com");
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert!((config.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.max_tokens, 300);
        assert!(config.enabled);
    }

    #[test]
    fn config_from_toml() {
        let toml_str = r#"
model = "gpt-4o-mini"
max_tokens = 200
enabled = false
"#;
        let config: CompletionConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 200);
        assert_eq!(config.timeout_secs, 15);
        assert!(!config.enabled);
        assert!(config.api_key.is_none());
    }
}
