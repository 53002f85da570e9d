pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::answers::handlers as answers;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Answers API
        .route(
            "/api/v1/answers",
            get(answers::handle_list)
                .post(answers::handle_record)
                .delete(answers::handle_clear),
        )
        .route("/api/v1/answers/resolve", post(answers::handle_resolve))
        .route("/api/v1/answers/lookup", post(answers::handle_lookup))
        // Jobs API
        .route("/api/v1/jobs/analyze", post(jobs::handle_analyze))
        .route("/api/v1/jobs/cover-letter", post(jobs::handle_cover_letter))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::answers::store::AnswerStore;
    use crate::config::Config;
    use crate::llm_client::{LlmError, TextGenerator};

    struct CountingGenerator {
        reply: Option<&'static str>,
        calls: AtomicU32,
    }

    #[async_trait]
    impl TextGenerator for CountingGenerator {
        async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.map(str::to_string).ok_or(LlmError::EmptyContent)
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn test_app(reply: Option<&'static str>) -> (TempDir, Arc<CountingGenerator>, Router) {
        let dir = TempDir::new().unwrap();
        let config = Config::from_lookup(|key| match key {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            "DATA_DIR" => Some(dir.path().display().to_string()),
            _ => None,
        })
        .unwrap();
        let store = AnswerStore::open(&config.answer_store_path).unwrap();
        let generator = Arc::new(CountingGenerator {
            reply,
            calls: AtomicU32::new(0),
        });
        let state = AppState::new(store, generator.clone(), "Skills: Rust".to_string(), config);
        (dir, generator, build_router(state))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(b) => Body::from(b.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (_dir, _gen, app) = test_app(None);
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_resolve_generates_then_remembers() {
        let (_dir, generator, app) = test_app(Some("5"));
        let field = json!({"label": "Years of experience?", "type": "text"});

        let (status, body) =
            send(&app, Method::POST, "/api/v1/answers/resolve", Some(field.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"answer": "5", "skipped": false}));

        let (_, body) = send(&app, Method::POST, "/api/v1/answers/resolve", Some(field)).await;
        assert_eq!(body["answer"], "5");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);

        let (_, list) = send(&app, Method::GET, "/api/v1/answers", None).await;
        assert_eq!(list["count"], 1);
        assert_eq!(list["questions"]["years_of_experience"]["use_count"], 2);
    }

    #[tokio::test]
    async fn test_resolve_failure_is_skipped() {
        let (_dir, _gen, app) = test_app(None);
        let field = json!({"label": "Desired salary?", "type": "text"});

        let (status, body) = send(&app, Method::POST, "/api/v1/answers/resolve", Some(field)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"answer": null, "skipped": true}));

        let (_, list) = send(&app, Method::GET, "/api/v1/answers", None).await;
        assert_eq!(list["count"], 0);
    }

    #[tokio::test]
    async fn test_resolve_rejects_missing_label() {
        let (_dir, generator, app) = test_app(Some("x"));
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/answers/resolve",
            Some(json!({"type": "radio", "options": ["Yes", "No"]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_record_then_lookup_fuzzy() {
        let (_dir, generator, app) = test_app(Some("unused"));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/answers",
            Some(json!({"question": "Are you authorized to work in the US?", "answer": "Yes", "type": "radio"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["key"], "are_you_authorized_to_work_in_the_us");

        let (_, body) = send(
            &app,
            Method::POST,
            "/api/v1/answers/lookup",
            Some(json!({"question": "Authorized to work in US?"})),
        )
        .await;
        assert_eq!(body["answer"], "Yes");

        let (_, body) = send(
            &app,
            Method::POST,
            "/api/v1/answers/lookup",
            Some(json!({"question": "What is your desired salary?"})),
        )
        .await;
        assert_eq!(body["answer"], Value::Null);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lookup_rejects_bad_threshold() {
        let (_dir, _gen, app) = test_app(None);
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/answers/lookup",
            Some(json!({"question": "Anything?", "threshold": 2.0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_lookup_rejects_punctuation_only_question() {
        let (_dir, _gen, app) = test_app(None);
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/answers/lookup",
            Some(json!({"question": " ?. "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_clear() {
        let (_dir, _gen, app) = test_app(None);
        send(
            &app,
            Method::POST,
            "/api/v1/answers",
            Some(json!({"question": "Are you a veteran?", "answer": "No"})),
        )
        .await;

        let (status, _) = send(&app, Method::DELETE, "/api/v1/answers", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, "/api/v1/answers", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, list) = send(&app, Method::GET, "/api/v1/answers", None).await;
        assert_eq!(list, json!({"count": 0, "questions": {}}));
    }

    #[tokio::test]
    async fn test_analyze_job() {
        let (_dir, _gen, app) = test_app(Some(r#"{"score": 91, "reason": "Great fit"}"#));
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/jobs/analyze",
            Some(json!({"title": "Rust Engineer", "company": "Acme"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], 91);
        assert_eq!(body["should_apply"], true);
    }

    #[tokio::test]
    async fn test_cover_letter_falls_back() {
        let (_dir, _gen, app) = test_app(None);
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/jobs/cover-letter",
            Some(json!({"title": "Rust Engineer", "company": "Acme"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["cover_letter"]
            .as_str()
            .unwrap()
            .contains("Rust Engineer position at Acme"));
    }
}
