/// LLM Client — every text-generation call in Autofill goes through here.
///
/// Callers see a single `TextGenerator` (system prompt + user prompt in, text
/// out). Which provider actually answers is decided once at startup by
/// building a `FallbackGenerator` over the configured backends.
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub mod anthropic;
pub mod fallback;
pub mod openai;
pub mod prompts;

pub use anthropic::AnthropicClient;
pub use fallback::FallbackGenerator;
pub use openai::OpenAiCompatibleClient;

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("No LLM backends configured")]
    NoBackends,
}

/// Opaque text-in/text-out generation capability.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError>;

    /// Backend name, for logs.
    fn name(&self) -> &str;
}

/// Generates and deserializes a JSON response.
/// The prompt must instruct the model to return valid JSON.
pub async fn generate_json<T: DeserializeOwned>(
    generator: &dyn TextGenerator,
    system: &str,
    prompt: &str,
) -> Result<T, LlmError> {
    let text = generator.generate(system, prompt).await?;

    // Strip markdown code fences if the model wraps JSON in them
    let text = strip_json_fences(&text);

    serde_json::from_str(text).map_err(LlmError::Parse)
}

/// Backoff before retry `attempt` (1-based): 1s, 2s, 4s.
fn retry_delay(attempt: u32) -> Duration {
    Duration::from_millis(1000 * (1 << (attempt - 1)))
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    struct Canned(&'static str);

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    #[derive(Debug, Deserialize)]
    struct Score {
        score: u32,
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_retry_delay_doubles() {
        assert_eq!(retry_delay(1), Duration::from_secs(1));
        assert_eq!(retry_delay(2), Duration::from_secs(2));
        assert_eq!(retry_delay(3), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_generate_json_parses_fenced_output() {
        let generator = Canned("```json\n{\"score\": 82}\n```");
        let parsed: Score = generate_json(&generator, "sys", "prompt").await.unwrap();
        assert_eq!(parsed.score, 82);
    }

    #[tokio::test]
    async fn test_generate_json_rejects_prose() {
        let generator = Canned("Sure! The score is 82.");
        let result: Result<Score, _> = generate_json(&generator, "sys", "prompt").await;
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }
}
