//! Prompt templates for the analysis pipeline.
//!
//! Both prompts are plain freeform text sent identically to every backend;
//! the evaluation prompt instructs the model to answer in the labeled-section
//! format the parser expects (SCORE / GAPS / MISSING_KEYWORDS / RECOMMENDATIONS).

/// Ideal-resume prompt. Replace `{company}` and `{job_role}` before sending.
const IDEAL_RESUME_PROMPT_TEMPLATE: &str = r#"Generate a highly optimized, professional resume for the position of {job_role} at {company}.

This should be a comprehensive, detailed resume that includes:
1. Professional Summary
2. Key Skills and Technologies
3. Work Experience with quantified achievements
4. Education and Certifications
5. Projects and Technical Expertise
6. Industry-specific keywords

Make it specific to {company}'s requirements and {job_role} expectations.
Format it as a complete, professional resume."#;

/// Evaluation prompt. Replace `{resume_text}`, `{ideal_resume}`, `{company}`,
/// and `{job_role}` before sending.
const EVALUATION_PROMPT_TEMPLATE: &str = r#"You are an expert resume analyst. Compare the user's resume against the ideal resume for {job_role} at {company}.

USER RESUME:
{resume_text}

IDEAL RESUME (BENCHMARK):
{ideal_resume}

Please provide:
1. OVERALL SCORE (0-100): Rate the user's resume against the ideal
2. SPECIFIC GAPS: List 3-5 specific areas where the user's resume is lacking
3. MISSING KEYWORDS: Important keywords missing from user's resume
4. RECOMMENDATIONS: 3-4 actionable improvement suggestions

Format your response as:
SCORE: [number]
GAPS: [list of gaps]
MISSING_KEYWORDS: [list of keywords]
RECOMMENDATIONS: [list of recommendations]"#;

pub fn build_ideal_resume_prompt(company: &str, job_role: &str) -> String {
    IDEAL_RESUME_PROMPT_TEMPLATE
        .replace("{company}", company)
        .replace("{job_role}", job_role)
}

pub fn build_evaluation_prompt(
    resume_text: &str,
    ideal_resume: &str,
    company: &str,
    job_role: &str,
) -> String {
    EVALUATION_PROMPT_TEMPLATE
        .replace("{resume_text}", resume_text)
        .replace("{ideal_resume}", ideal_resume)
        .replace("{company}", company)
        .replace("{job_role}", job_role)
}
