//! Axum route handlers for the Jobs API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::jobs::analyzer::{analyze_job, JobAnalysis};
use crate::jobs::cover_letter::generate_cover_letter;
use crate::jobs::JobPosting;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

/// POST /api/v1/jobs/analyze
///
/// Scores a listing against the candidate profile. A failed analysis is
/// reported as score 0 with the failure in `reason`, not as an error.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(job): Json<JobPosting>,
) -> Json<JobAnalysis> {
    let analysis = analyze_job(
        state.generator.as_ref(),
        &state.profile,
        &job,
        state.config.min_job_score,
    )
    .await;

    Json(analysis)
}

/// POST /api/v1/jobs/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(job): Json<JobPosting>,
) -> Json<CoverLetterResponse> {
    let cover_letter = generate_cover_letter(state.generator.as_ref(), &state.profile, &job).await;
    Json(CoverLetterResponse { cover_letter })
}
