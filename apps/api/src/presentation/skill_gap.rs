use serde::Serialize;

use crate::models::SkillComparison;

/// Display form of a `SkillComparison`. Formats values only; nothing is recomputed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGapView {
    /// Whole-number percentage, e.g. `"67%"`.
    pub match_label: String,
    /// Progress bar value in `[0, 100]`.
    pub progress: f64,
    pub summary: String,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub perfect_match: bool,
}

impl From<&SkillComparison> for SkillGapView {
    fn from(comparison: &SkillComparison) -> Self {
        let pct = comparison.match_percentage;
        let progress = if pct.is_finite() { pct.clamp(0.0, 100.0) } else { 0.0 };

        Self {
            match_label: format!("{pct:.0}%"),
            progress,
            summary: format!(
                "You match {} out of {} required skills",
                comparison.total_matched, comparison.total_required
            ),
            matched: comparison.matched_skills.to_vec(),
            missing: comparison.missing_skills.to_vec(),
            perfect_match: comparison.missing_skills.is_empty(),
        }
    }
}

impl SkillGapView {
    /// Heading for the matched badges, e.g. "Skills You Have (2)".
    pub fn matched_heading(&self) -> String {
        format!("Skills You Have ({})", self.matched.len())
    }

    /// Heading for the missing badges, e.g. "Skills to Learn (1)".
    pub fn missing_heading(&self) -> String {
        format!("Skills to Learn ({})", self.missing.len())
    }
}
