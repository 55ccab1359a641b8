// Prompts for the resume review. Both providers send the same text.

use crate::models::Resume;

/// System prompt for the resume review. Output is Markdown, streamed as-is.
pub const REVIEW_SYSTEM: &str = "You are an expert resume reviewer and career coach. \
    You give specific, actionable feedback grounded only in the resume you are shown. \
    Do NOT invent experience, employers, or qualifications. \
    Respond in Markdown.";

/// Review prompt template. Replace `{resume_text}` before sending.
pub const REVIEW_PROMPT_TEMPLATE: &str = r#"Review the following resume and give feedback in these sections:

## Summary
Two or three sentences on the overall impression.

## Strengths
Bullet points naming what already works well.

## Weaknesses
Bullet points naming gaps, vague wording, or missing evidence of impact.

## Suggestions
Concrete rewrites or additions, most important first.

## Score
A single line: "Score: N/10".

RESUME:
{resume_text}"#;

/// Fills the review template with the resume's plain-text rendering.
pub fn review_prompt(resume: &Resume) -> String {
    REVIEW_PROMPT_TEMPLATE.replace("{resume_text}", &resume.to_plain_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_prompt_embeds_resume_text() {
        let resume = Resume {
            title: "Platform Engineer".to_string(),
            skills: vec!["Kubernetes".to_string()],
            ..Resume::default()
        };
        let prompt = review_prompt(&resume);
        assert!(prompt.ends_with("RESUME:\nTITLE: Platform Engineer\n\nSKILLS: Kubernetes"));
        assert!(!prompt.contains("{resume_text}"));
    }
}
