// Prompt constants for answering application form fields.

use crate::answers::field::FormField;

/// System prompt for form-field answers.
pub const ANSWER_SYSTEM: &str = "You are an expert at filling job application forms.
Given a question and the candidate's resume, provide a concise, accurate answer.

Rules:
1. Be truthful based on the resume
2. For yes/no questions, answer \"Yes\" or \"No\"
3. For number questions, provide just the number
4. For text questions, keep answers under 100 characters
5. For dropdown/radio/checkbox, choose only from the provided options
6. Return only the answer itself, with no explanation or preamble";

/// Field prompt template.
/// Replace: {resume}, {question}, {field_type}, {options_line}
const ANSWER_PROMPT_TEMPLATE: &str = "Resume:
{resume}

Question: {question}
Field Type: {field_type}
{options_line}
Provide only the answer, no explanation.";

/// Builds the user prompt for one field. The options line is only present
/// when the field carries options.
pub fn build_answer_prompt(profile: &str, field: &FormField) -> String {
    let options_line = field
        .options()
        .map(|options| format!("Options: {}\n", options.join(", ")))
        .unwrap_or_default();

    ANSWER_PROMPT_TEMPLATE
        .replace("{question}", field.label())
        .replace("{field_type}", field.field_type().as_str())
        .replace("{options_line}", &options_line)
        .replace("{resume}", profile)
}
