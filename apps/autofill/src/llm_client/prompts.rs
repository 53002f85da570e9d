// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to a system prompt when the caller expects JSON back.
pub const JSON_ONLY_INSTRUCTION: &str = "\n\nYou MUST respond with valid JSON only. \
    Do NOT use markdown code fences. \
    Do NOT include explanations.";

/// Builds a system prompt that enforces JSON-only output.
pub fn json_only(system: &str) -> String {
    format!("{system}{JSON_ONLY_INSTRUCTION}")
}
