//! Ordered provider chain: backends are tried in sequence and the first
//! success wins. Callers only ever see one `TextGenerator`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::{LlmError, TextGenerator};

pub struct FallbackGenerator {
    backends: Vec<Arc<dyn TextGenerator>>,
}

impl FallbackGenerator {
    pub fn new(backends: Vec<Arc<dyn TextGenerator>>) -> Self {
        Self { backends }
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }
}

#[async_trait]
impl TextGenerator for FallbackGenerator {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for (i, backend) in self.backends.iter().enumerate() {
            match backend.generate(system, prompt).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    if i + 1 < self.backends.len() {
                        warn!("{} failed ({}), falling back to next provider", backend.name(), e);
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(LlmError::NoBackends))
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Scripted {
        name: &'static str,
        reply: Option<&'static str>,
        calls: AtomicU32,
    }

    impl Scripted {
        fn ok(name: &'static str, reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: Some(reply),
                calls: AtomicU32::new(0),
            })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: None,
                calls: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.map(str::to_string).ok_or(LlmError::Api {
                status: 503,
                message: format!("{} unavailable", self.name),
            })
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let first = Scripted::ok("fireworks", "Yes");
        let second = Scripted::ok("openai", "No");
        let chain = FallbackGenerator::new(vec![first.clone(), second.clone()]);

        assert_eq!(chain.generate("s", "p").await.unwrap(), "Yes");
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_falls_back_in_order() {
        let first = Scripted::failing("fireworks");
        let second = Scripted::ok("openai", "No");
        let chain = FallbackGenerator::new(vec![first.clone(), second.clone()]);

        assert_eq!(chain.generate("s", "p").await.unwrap(), "No");
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_failing_returns_last_error() {
        let chain = FallbackGenerator::new(vec![
            Scripted::failing("fireworks"),
            Scripted::failing("openai"),
        ]);

        match chain.generate("s", "p").await {
            Err(LlmError::Api { message, .. }) => assert_eq!(message, "openai unavailable"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_chain() {
        let chain = FallbackGenerator::new(vec![]);
        assert!(chain.is_empty());
        assert!(matches!(
            chain.generate("s", "p").await,
            Err(LlmError::NoBackends)
        ));
    }

    #[test]
    fn test_backend_names_in_order() {
        let chain = FallbackGenerator::new(vec![
            Scripted::ok("fireworks", "x"),
            Scripted::ok("openai", "y"),
        ]);
        assert_eq!(chain.backend_names(), vec!["fireworks", "openai"]);
    }
}
