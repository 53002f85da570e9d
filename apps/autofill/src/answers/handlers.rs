//! Axum route handlers for the Answers API.

use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use crate::answers::field::{FieldType, FormField};
use crate::answers::store::{question_key, AnswerRecord};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub answer: Option<String>,
    pub skipped: bool,
}

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub question: String,
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub answer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    pub question: String,
    pub answer: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerListResponse {
    pub count: usize,
    pub questions: BTreeMap<String, AnswerRecord>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/answers/resolve
///
/// Answers one form field from memory, generating (and memorizing) an answer
/// on a miss. `skipped: true` means no answer could be produced and the
/// caller should leave the field alone.
pub async fn handle_resolve(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, AppError> {
    let field = FormField::new(request.label, request.field_type, request.options)?;

    let span = info_span!("resolve", request_id = %Uuid::new_v4());
    let answer = state.resolver.get_answer(&field).instrument(span).await?;

    if answer.is_none() {
        warn!("Skipping field with no answer: {}", field.label());
    }

    Ok(Json(ResolveResponse {
        skipped: answer.is_none(),
        answer,
    }))
}

/// POST /api/v1/answers/lookup
///
/// Memory-only lookup; never calls the generator.
pub async fn handle_lookup(
    State(state): State<AppState>,
    Json(request): Json<LookupRequest>,
) -> Result<Json<LookupResponse>, AppError> {
    let field = FormField::text(request.question)?;

    let threshold = request.threshold.unwrap_or(state.config.fuzzy_threshold);
    if !(0.0..=1.0).contains(&threshold) {
        return Err(AppError::Validation(
            "threshold must be between 0 and 1".to_string(),
        ));
    }

    let answer = state.store.lock().await.get(field.label(), threshold)?;
    Ok(Json(LookupResponse { answer }))
}

/// POST /api/v1/answers
///
/// Records an answer obtained outside the resolver (e.g. typed by the user).
pub async fn handle_record(
    State(state): State<AppState>,
    Json(request): Json<RecordRequest>,
) -> Result<(StatusCode, Json<RecordResponse>), AppError> {
    if request.question.trim().is_empty() {
        return Err(AppError::Validation("question cannot be empty".to_string()));
    }
    if request.answer.trim().is_empty() {
        return Err(AppError::Validation("answer cannot be empty".to_string()));
    }

    state
        .store
        .lock()
        .await
        .store(&request.question, &request.answer, request.field_type)?;

    Ok((
        StatusCode::CREATED,
        Json(RecordResponse {
            key: question_key(&request.question),
        }),
    ))
}

/// GET /api/v1/answers
pub async fn handle_list(State(state): State<AppState>) -> Json<AnswerListResponse> {
    let store = state.store.lock().await;
    Json(AnswerListResponse {
        count: store.len(),
        questions: store.get_all().clone(),
    })
}

/// DELETE /api/v1/answers
pub async fn handle_clear(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.lock().await.clear()?;
    Ok(StatusCode::NO_CONTENT)
}
