//! Job fit analysis — scores a listing against the candidate profile.
//!
//! Never fails: an unusable LLM response produces a zero-score analysis with
//! `should_apply = false`, so one bad listing cannot stall a search run.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::jobs::prompts::{ANALYZE_PROMPT_TEMPLATE, ANALYZE_SYSTEM};
use crate::jobs::JobPosting;
use crate::llm_client::prompts::json_only;
use crate::llm_client::{generate_json, TextGenerator};

#[derive(Debug, Clone, Serialize)]
pub struct JobAnalysis {
    pub score: u32, // 0 – 100
    pub reason: String,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub should_apply: bool,
}

/// Raw model output; the score may come back as a float or out of range.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    score: f64,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    matching_skills: Vec<String>,
    #[serde(default)]
    missing_skills: Vec<String>,
}

impl JobAnalysis {
    fn from_raw(raw: RawAnalysis, min_score: u32) -> Self {
        let score = raw.score.round().clamp(0.0, 100.0) as u32;
        Self {
            score,
            reason: raw.reason,
            matching_skills: raw.matching_skills,
            missing_skills: raw.missing_skills,
            should_apply: score >= min_score,
        }
    }

    fn failed(reason: impl std::fmt::Display) -> Self {
        Self {
            score: 0,
            reason: format!("Analysis failed: {reason}"),
            matching_skills: vec![],
            missing_skills: vec![],
            should_apply: false,
        }
    }
}

pub fn build_analyze_prompt(profile: &str, job: &JobPosting) -> String {
    ANALYZE_PROMPT_TEMPLATE
        .replace("{title}", JobPosting::field(&job.title, "Unknown"))
        .replace("{company}", JobPosting::field(&job.company, "Unknown"))
        .replace(
            "{description}",
            JobPosting::field(&job.description, "No description available"),
        )
        .replace("{resume}", profile)
}

/// Scores `job` against `profile`; `should_apply` is `score >= min_score`.
pub async fn analyze_job(
    generator: &dyn TextGenerator,
    profile: &str,
    job: &JobPosting,
    min_score: u32,
) -> JobAnalysis {
    let prompt = build_analyze_prompt(profile, job);
    let system = json_only(ANALYZE_SYSTEM);

    match generate_json::<RawAnalysis>(generator, &system, &prompt).await {
        Ok(raw) => {
            let analysis = JobAnalysis::from_raw(raw, min_score);
            info!(
                "Job '{}' scored {}/100 (apply: {})",
                JobPosting::field(&job.title, "Unknown"),
                analysis.score,
                analysis.should_apply
            );
            analysis
        }
        Err(e) => {
            warn!("Error analyzing job: {}", e);
            JobAnalysis::failed(e)
        }
    }
}
