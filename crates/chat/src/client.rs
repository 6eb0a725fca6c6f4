//! OpenAI-compatible chat-completions client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use portfolio_core::errors::{AssistantError, AssistantResult};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// One role-tagged message in a completion prompt.
#[derive(Debug, Clone, Serialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// The language-model boundary: single-shot, synchronous completion of an
/// ordered message list.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    async fn complete(&self, messages: &[PromptMessage]) -> AssistantResult<String>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

/// Chat-completions client with a fixed sampling policy (temperature 0.7,
/// 500-token budget).
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: std::time::Duration,
    ) -> AssistantResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistantError::Transient(e.to_string()))?;

        Ok(Self {
            http,
            base_url: OPENAI_API_BASE.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: 500,
        })
    }

    /// Point at a different API base (tests, compatible providers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl CompletionApi for OpenAiClient {
    async fn complete(&self, messages: &[PromptMessage]) -> AssistantResult<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(model = %self.model, messages = messages.len(), "Requesting completion");

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::Transient(format!("completion request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Completion API error: {status} - {body}");
            return match status.as_u16() {
                401 | 403 => Err(AssistantError::Authorization(format!("{status}: {body}"))),
                408 | 429 => Err(AssistantError::Transient(format!("{status}: {body}"))),
                s if s >= 500 => Err(AssistantError::Transient(format!("{status}: {body}"))),
                _ => Err(AssistantError::External(eyre::eyre!(
                    "completion API returned {status}: {body}"
                ))),
            };
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::External(eyre::eyre!("completion parse error: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AssistantError::External(eyre::eyre!("completion had no choices")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> OpenAiClient {
        OpenAiClient::new("sk-test", "gpt-3.5-turbo", std::time::Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "temperature": 0.7,
                "max_tokens": 500
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "He has five years of Rust." } }
                ]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let reply = client
            .complete(&[
                PromptMessage::system("You are an assistant."),
                PromptMessage::user("How much Rust experience?"),
            ])
            .await
            .unwrap();

        assert_eq!(reply, "He has five years of Rust.");
    }

    #[tokio::test]
    async fn test_rate_limit_is_transient() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .complete(&[PromptMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::Transient(_)));
    }

    #[tokio::test]
    async fn test_bad_key_is_authorization_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .complete(&[PromptMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::Authorization(_)));
    }
}
