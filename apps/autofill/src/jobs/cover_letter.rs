use tracing::warn;

use crate::jobs::prompts::{
    COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM, FALLBACK_COVER_LETTER_TEMPLATE,
};
use crate::jobs::JobPosting;
use crate::llm_client::TextGenerator;

pub fn build_cover_letter_prompt(profile: &str, job: &JobPosting) -> String {
    COVER_LETTER_PROMPT_TEMPLATE
        .replace("{title}", JobPosting::field(&job.title, "this position"))
        .replace("{company}", JobPosting::field(&job.company, "your company"))
        .replace("{description}", JobPosting::field(&job.description, ""))
        .replace("{resume}", profile)
}

fn fallback_letter(job: &JobPosting) -> String {
    FALLBACK_COVER_LETTER_TEMPLATE
        .replace("{title}", JobPosting::field(&job.title, "this position"))
        .replace("{company}", JobPosting::field(&job.company, "your company"))
}

/// Drafts a cover letter for `job`. Falls back to a fixed template letter if
/// generation fails or comes back blank.
pub async fn generate_cover_letter(
    generator: &dyn TextGenerator,
    profile: &str,
    job: &JobPosting,
) -> String {
    let prompt = build_cover_letter_prompt(profile, job);

    match generator.generate(COVER_LETTER_SYSTEM, &prompt).await {
        Ok(letter) if !letter.trim().is_empty() => letter.trim().to_string(),
        Ok(_) => {
            warn!("Cover letter generation returned no text, using template");
            fallback_letter(job)
        }
        Err(e) => {
            warn!("Error generating cover letter: {}", e);
            fallback_letter(job)
        }
    }
}
