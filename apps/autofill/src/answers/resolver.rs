//! Answer Resolver — memorized answer first, generated answer second.
//!
//! Flow: store lookup (exact → fuzzy) → on miss, prompt the generator with
//! the candidate profile → store the generated answer → return it.
//!
//! A generation failure is a per-field outcome (`Ok(None)`: skip the field),
//! never an error. Only a store that cannot persist is an error.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::answers::field::FormField;
use crate::answers::prompts::{build_answer_prompt, ANSWER_SYSTEM};
use crate::answers::store::{AnswerStore, StoreError, DEFAULT_FUZZY_THRESHOLD};
use crate::llm_client::TextGenerator;

#[derive(Clone)]
pub struct AnswerResolver {
    store: Arc<Mutex<AnswerStore>>,
    generator: Arc<dyn TextGenerator>,
    profile: Arc<str>,
    threshold: f64,
}

impl AnswerResolver {
    pub fn new(
        store: Arc<Mutex<AnswerStore>>,
        generator: Arc<dyn TextGenerator>,
        profile: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            store,
            generator,
            profile: profile.into(),
            threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Returns an answer for `field`, or `None` if the field should be skipped.
    ///
    /// The store lock is held for the whole lookup → generate → store
    /// sequence, so two requests for the same unseen question never both
    /// reach the generator.
    pub async fn get_answer(&self, field: &FormField) -> Result<Option<String>, StoreError> {
        let question = field.label();
        let mut store = self.store.lock().await;

        if let Some(answer) = store.get(question, self.threshold)? {
            info!("Using cached answer for: {}", question);
            return Ok(Some(answer));
        }

        info!("Generating answer for: {}", question);
        let prompt = build_answer_prompt(&self.profile, field);

        let answer = match self.generator.generate(ANSWER_SYSTEM, &prompt).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("Error generating answer for '{}': {}", question, e);
                return Ok(None);
            }
        };

        if answer.is_empty() {
            warn!("Generator returned an empty answer for '{}'", question);
            return Ok(None);
        }

        store.store(question, &answer, field.field_type())?;
        Ok(Some(answer))
    }
}
