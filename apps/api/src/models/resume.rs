use serde::{Deserialize, Serialize};

/// Resume document submitted for an AI review.
/// Every section is optional on the wire; missing sections deserialize empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Resume {
    pub title: String,
    pub summary: Option<String>,
    pub skills: Vec<String>,
    pub experiences: Vec<Experience>,
    pub education: Vec<Education>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
}

impl Resume {
    /// True when there is nothing to review.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty()
            && self.summary.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.skills.iter().all(|s| s.trim().is_empty())
            && self.experiences.is_empty()
            && self.education.is_empty()
    }

    /// Renders the resume as labelled plain-text sections for a prompt.
    /// Empty sections are omitted.
    pub fn to_plain_text(&self) -> String {
        let mut sections = Vec::new();

        if !self.title.trim().is_empty() {
            sections.push(format!("TITLE: {}", self.title.trim()));
        }

        if let Some(summary) = self.summary.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            sections.push(format!("SUMMARY:\n{summary}"));
        }

        let skills: Vec<&str> = self
            .skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if !skills.is_empty() {
            sections.push(format!("SKILLS: {}", skills.join(", ")));
        }

        if !self.experiences.is_empty() {
            let entries: Vec<String> = self
                .experiences
                .iter()
                .map(|e| {
                    let mut entry = format!("- {} at {}", e.title.trim(), e.company.trim());
                    if !e.description.trim().is_empty() {
                        entry.push_str(&format!("\n  {}", e.description.trim()));
                    }
                    entry
                })
                .collect();
            sections.push(format!("EXPERIENCE:\n{}", entries.join("\n")));
        }

        if !self.education.is_empty() {
            let entries: Vec<String> = self
                .education
                .iter()
                .map(|e| format!("- {}, {}", e.degree.trim(), e.institution.trim()))
                .collect();
            sections.push(format!("EDUCATION:\n{}", entries.join("\n")));
        }

        sections.join("\n\n")
    }
}
