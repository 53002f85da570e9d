//! OpenAI-compatible chat completions backend.
//!
//! Serves both OpenAI and Fireworks AI, which expose the same
//! `/chat/completions` wire format under different base URLs.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{retry_delay, LlmError, TextGenerator, MAX_RETRIES, REQUEST_TIMEOUT};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const FIREWORKS_BASE_URL: &str = "https://api.fireworks.ai/inference/v1";

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 2000;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl ChatResponse {
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Chat completions client for any OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    client: Client,
    name: String,
    base_url: String,
    model: String,
    api_key: Secret<String>,
}

impl OpenAiCompatibleClient {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: String,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: Secret::new(api_key),
        })
    }

    pub fn openai(model: impl Into<String>, api_key: String) -> Result<Self, LlmError> {
        Self::new("OpenAI", OPENAI_BASE_URL, model, api_key)
    }

    pub fn fireworks(model: impl Into<String>, api_key: String) -> Result<Self, LlmError> {
        Self::new("Fireworks AI", FIREWORKS_BASE_URL, model, api_key)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Sends one chat completion, retrying 429 and 5xx with exponential backoff.
    async fn complete(&self, system: &str, prompt: &str) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = retry_delay(attempt);
                warn!(
                    "{} call attempt {} failed, retrying after {}ms...",
                    self.name,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(self.completions_url())
                .bearer_auth(self.api_key.expose_secret())
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("{} returned {}: {}", self.name, status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            if let Some(usage) = &chat_response.usage {
                debug!(
                    "{} call succeeded: prompt_tokens={}, completion_tokens={}",
                    self.name, usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(chat_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleClient {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        self.complete(system, prompt)
            .await?
            .into_text()
            .ok_or(LlmError::EmptyContent)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url_strips_trailing_slash() {
        let client =
            OpenAiCompatibleClient::new("local", "http://localhost:8000/v1/", "m", "k".into())
                .unwrap();
        assert_eq!(client.completions_url(), "http://localhost:8000/v1/chat/completions");
    }

    #[test]
    fn test_named_constructors() {
        let fireworks = OpenAiCompatibleClient::fireworks("llama", "k".into()).unwrap();
        assert_eq!(fireworks.name(), "Fireworks AI");
        assert_eq!(
            fireworks.completions_url(),
            "https://api.fireworks.ai/inference/v1/chat/completions"
        );

        let openai = OpenAiCompatibleClient::openai("gpt-4o", "k".into()).unwrap();
        assert_eq!(openai.name(), "OpenAI");
        assert_eq!(openai.model(), "gpt-4o");
    }

    #[test]
    fn test_response_text_from_first_choice() {
        let raw = r#"{
            "choices": [{"message": {"role": "assistant", "content": "5"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 300, "completion_tokens": 1, "total_tokens": 301}
        }"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.into_text().as_deref(), Some("5"));
    }

    #[test]
    fn test_response_with_null_content() {
        let raw = r#"{"choices": [{"message": {"content": null}}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.into_text(), None);
    }

    #[test]
    fn test_request_carries_system_then_user() {
        let body = ChatRequest {
            model: "gpt-4o",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "rules",
                },
                ChatMessage {
                    role: "user",
                    content: "question",
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "question");
        assert_eq!(value["max_tokens"], 2000);
    }
}
