use std::sync::Arc;

use tokio::sync::Mutex;

use crate::answers::resolver::AnswerResolver;
use crate::answers::store::AnswerStore;
use crate::config::Config;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one answer store for this process; the resolver shares the same lock.
    pub store: Arc<Mutex<AnswerStore>>,
    pub resolver: AnswerResolver,
    /// Provider chain used for everything that is not a form-field answer.
    pub generator: Arc<dyn TextGenerator>,
    /// Candidate resume text, loaded once at startup.
    pub profile: Arc<str>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        store: AnswerStore,
        generator: Arc<dyn TextGenerator>,
        profile: String,
        config: Config,
    ) -> Self {
        let store = Arc::new(Mutex::new(store));
        let profile: Arc<str> = profile.into();
        let resolver = AnswerResolver::new(store.clone(), generator.clone(), profile.clone())
            .with_threshold(config.fuzzy_threshold);

        Self {
            store,
            resolver,
            generator,
            profile,
            config,
        }
    }
}
