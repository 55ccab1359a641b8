use serde::Serialize;

use crate::models::CourseRecommendation;

/// Skill badges shown per card before collapsing into "+N more".
pub const CARD_SKILL_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseCardView {
    pub title: String,
    pub provider: String,
    pub url: String,
    pub skills: Vec<String>,
    /// `"+2 more"` when the course lists more skills than fit on the card.
    pub more_skills_label: Option<String>,
    pub match_badge: Option<String>,
    pub rating_label: Option<String>,
    pub level_duration: Option<String>,
    pub image_url: Option<String>,
    pub provider_image_url: Option<String>,
}

impl From<&CourseRecommendation> for CourseCardView {
    fn from(course: &CourseRecommendation) -> Self {
        let all_skills: Vec<&str> = course.skills().collect();
        let hidden = all_skills.len().saturating_sub(CARD_SKILL_LIMIT);

        Self {
            title: course.course_name.clone(),
            provider: course.provider.clone(),
            url: course.course_url.clone(),
            skills: all_skills
                .iter()
                .take(CARD_SKILL_LIMIT)
                .map(|s| s.to_string())
                .collect(),
            more_skills_label: (hidden > 0).then(|| format!("+{hidden} more")),
            match_badge: (course.match_percentage > 0.0)
                .then(|| format!("{}% Match", course.match_percentage)),
            rating_label: course
                .rating
                .filter(|r| r.is_finite() && *r > 0.0)
                .map(|r| format!("{r:.1}")),
            level_duration: non_blank(&course.level_duration),
            image_url: non_blank(&course.course_image),
            provider_image_url: non_blank(&course.provider_image),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
