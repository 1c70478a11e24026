// Prompt templates for the two AI proxy endpoints.
// Inputs are interpolated verbatim; the upstream model gets no system prompt.

/// Output cap for resume analysis.
pub const ANALYZE_RESUME_MAX_TOKENS: u32 = 300;

/// Output cap for mock interview generation.
pub const MOCK_INTERVIEW_MAX_TOKENS: u32 = 500;

/// Placeholder interpolated when the client omits the input field.
pub const MISSING_INPUT: &str = "undefined";

pub fn analyze_resume_prompt(resume_text: &str) -> String {
    format!(
        "Analyze the following resume and provide strengths, weaknesses, and suggestions: \n\n {resume_text}"
    )
}

pub fn mock_interview_prompt(job_role: &str) -> String {
    format!(
        "Generate a set of mock interview questions for a {job_role} position, along with AI feedback on answers."
    )
}
