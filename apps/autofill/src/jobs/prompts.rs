// Prompt constants for job analysis and cover letters.

/// System prompt for job fit analysis.
pub const ANALYZE_SYSTEM: &str = "You are an expert career advisor and job matcher.
Your task is to analyze job postings and score them based on how well they match a candidate's resume.

Scoring criteria:
- 90-100: Perfect match, highly relevant role
- 70-89: Good match, most requirements met
- 50-69: Moderate match, some skills align
- 30-49: Weak match, few skills align
- 0-29: Poor match, not relevant

Consider:
1. Skills match (technical and soft skills)
2. Experience level alignment
3. Role relevance to career goals
4. Company reputation (if known)";

/// Job analysis prompt template.
/// Replace: {title}, {company}, {description}, {resume}
pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"Candidate Resume:
{resume}

Job Posting:
Title: {title}
Company: {company}
Description: {description}

Analyze this job and respond with JSON:
{
    "score": <0-100>,
    "reason": "<brief explanation>",
    "matching_skills": ["skill1", "skill2"],
    "missing_skills": ["skill1", "skill2"]
}"#;

/// System prompt for cover letters.
pub const COVER_LETTER_SYSTEM: &str = "You are a professional cover letter writer.
Write compelling, personalized cover letters that:
1. Are 3 paragraphs long
2. Highlight relevant experience from the resume
3. Show genuine interest in the role
4. Are professional but warm in tone
5. Are concise (under 300 words)

Do NOT use generic phrases like \"I am writing to express my interest\".
Start with a strong hook.";

/// Cover letter prompt template.
/// Replace: {title}, {company}, {description}, {resume}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = "Job Title: {title}
Company: {company}
Job Description: {description}

Candidate Resume:
{resume}

Write a cover letter for this candidate applying to this job.";

/// Letter returned when generation fails.
/// Replace: {title}, {company}
pub const FALLBACK_COVER_LETTER_TEMPLATE: &str = "I am excited to apply for the {title} position at {company}.

With my background in software engineering and proven track record of delivering results, I believe I would be a strong addition to your team.

I look forward to discussing how my skills and experience align with your needs.

Best regards";
