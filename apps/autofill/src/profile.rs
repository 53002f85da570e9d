//! Candidate profile (resume) loading. Read once at startup.

use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

/// Used when no resume is available, so answers can still be produced.
pub const PLACEHOLDER_PROFILE: &str = "\
Skills: Python, Machine Learning, TensorFlow, PyTorch, AWS, Docker
Experience: 3 years as Machine Learning Engineer
- Built recommendation systems serving 1M+ users
- Deployed ML models to production using AWS SageMaker
- Developed NLP pipelines for text classification
Education: BS Computer Science
Target Role: Senior Machine Learning Engineer";

/// Loads the resume text from `path`. PDFs are converted to text; anything
/// else is read as UTF-8. A missing or blank resume yields the placeholder.
pub fn load_profile_text(path: &Path) -> Result<String> {
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    let raw = if is_pdf {
        if !path.exists() {
            return Ok(placeholder(path));
        }
        pdf_extract::extract_text(path)
            .with_context(|| format!("Failed to extract text from {}", path.display()))?
    } else {
        match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(placeholder(path)),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read resume {}", path.display()))
            }
        }
    };

    let text = raw.trim();
    if text.is_empty() {
        warn!("Resume at {} is empty, using placeholder profile", path.display());
        return Ok(PLACEHOLDER_PROFILE.to_string());
    }

    info!("Loaded resume from {} ({} chars)", path.display(), text.len());
    Ok(text.to_string())
}

fn placeholder(path: &Path) -> String {
    warn!(
        "Resume not found at {}, using placeholder profile. Add your actual resume there!",
        path.display()
    );
    PLACEHOLDER_PROFILE.to_string()
}
