use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::answers::store::DEFAULT_FUZZY_THRESHOLD;

const DEFAULT_FIREWORKS_MODEL: &str = "accounts/fireworks/models/llama-v3-70b-instruct";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const DEFAULT_MIN_JOB_SCORE: u32 = 70;

/// Application configuration loaded from environment variables.
/// Fails at startup if no LLM provider key is set or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub answer_store_path: PathBuf,
    pub resume_path: PathBuf,
    pub anthropic_api_key: Option<String>,
    pub fireworks_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub fireworks_model: String,
    pub openai_model: String,
    pub fuzzy_threshold: f64,
    pub min_job_score: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Blank values count as unset
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let data_dir = PathBuf::from(var("DATA_DIR").unwrap_or_else(|| "data".to_string()));
        let answer_store_path = var("ANSWER_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("application_memory.json"));
        let resume_path = var("RESUME_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("resume.txt"));

        let anthropic_api_key = var("ANTHROPIC_API_KEY");
        let fireworks_api_key = var("FIREWORKS_API_KEY");
        let openai_api_key = var("OPENAI_API_KEY");
        if anthropic_api_key.is_none() && fireworks_api_key.is_none() && openai_api_key.is_none() {
            bail!(
                "No LLM API keys found! Set FIREWORKS_API_KEY, OPENAI_API_KEY or ANTHROPIC_API_KEY"
            );
        }

        let fuzzy_threshold = match var("FUZZY_THRESHOLD") {
            Some(raw) => raw
                .parse::<f64>()
                .context("FUZZY_THRESHOLD must be a number")?,
            None => DEFAULT_FUZZY_THRESHOLD,
        };
        if !(0.0..=1.0).contains(&fuzzy_threshold) {
            bail!("FUZZY_THRESHOLD must be between 0 and 1, got {fuzzy_threshold}");
        }

        let min_job_score = match var("MIN_JOB_SCORE") {
            Some(raw) => raw
                .parse::<u32>()
                .context("MIN_JOB_SCORE must be a non-negative integer")?,
            None => DEFAULT_MIN_JOB_SCORE,
        };
        if min_job_score > 100 {
            bail!("MIN_JOB_SCORE must be at most 100, got {min_job_score}");
        }

        Ok(Config {
            data_dir,
            answer_store_path,
            resume_path,
            anthropic_api_key,
            fireworks_api_key,
            openai_api_key,
            fireworks_model: var("FIREWORKS_MODEL")
                .unwrap_or_else(|| DEFAULT_FIREWORKS_MODEL.to_string()),
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            fuzzy_threshold,
            min_job_score,
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
