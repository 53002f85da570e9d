// Job-level LLM helpers: fit analysis against the candidate profile and
// cover letter drafting. Both degrade to a safe default instead of failing.

pub mod analyzer;
pub mod cover_letter;
pub mod handlers;
pub mod prompts;

use serde::Deserialize;

/// A job listing as scraped by the caller. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPosting {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
}

impl JobPosting {
    /// Field value, or `default` when missing or blank.
    fn field<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }
}
