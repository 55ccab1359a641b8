//! JSON shapes spoken by the ML microservice.
//!
//! These types never leave `ml_client`: responses are converted into the
//! domain models before being returned to callers.

use serde::{Deserialize, Serialize};

use crate::models::{CourseRecommendation, SkillComparison, SkillSet};

#[derive(Debug, Serialize)]
pub(super) struct TextRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct CompareSkillsRequest<'a> {
    pub resume_skills: Vec<&'a str>,
    pub job_skills: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct RecommendCoursesRequest<'a> {
    pub missing_skills: Vec<&'a str>,
    pub top_n: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalyzeJobRequest<'a> {
    pub job_description: &'a str,
    pub resume_skills: Vec<&'a str>,
    pub top_n: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchCoursesRequest<'a> {
    pub query: &'a str,
    pub top_n: usize,
}

/// `/api/extract-skills` and `/api/extract-skills-from-pdf`.
/// `success` and `count` are ignored; the count is recomputed after normalization.
#[derive(Debug, Deserialize)]
pub(super) struct SkillExtractionResponse {
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CompareSkillsResponse {
    pub comparison: WireComparison,
}

/// Totals and percentage are not read: they are recomputed from the sets.
#[derive(Debug, Deserialize)]
pub(super) struct WireComparison {
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub extra_skills: Vec<String>,
}

impl From<WireComparison> for SkillComparison {
    fn from(wire: WireComparison) -> Self {
        SkillComparison::from_parts(
            SkillSet::from(wire.matched_skills),
            SkillSet::from(wire.missing_skills),
            SkillSet::from(wire.extra_skills),
        )
    }
}

/// `/api/recommend-courses`, `/api/search-courses`, `/api/courses/by-skill/{skill}`.
#[derive(Debug, Deserialize)]
pub(super) struct CourseListResponse {
    #[serde(default)]
    pub courses: Vec<WireCourse>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeJobResponse {
    pub skill_analysis: WireComparison,
    #[serde(default)]
    pub recommended_courses: Vec<WireCourse>,
}

/// Course rows come from a dataframe: any column can be null or absent.
/// Search results carry neither `provider_image` nor `match_percentage`.
#[derive(Debug, Deserialize)]
pub(super) struct WireCourse {
    pub course_name: Option<String>,
    pub provider: Option<String>,
    pub skills_gained: Option<String>,
    pub rating: Option<f64>,
    pub level_duration: Option<String>,
    pub course_url: Option<String>,
    pub course_image: Option<String>,
    pub provider_image: Option<String>,
    pub similarity_score: Option<f64>,
    pub match_percentage: Option<f64>,
}

impl From<WireCourse> for CourseRecommendation {
    fn from(wire: WireCourse) -> Self {
        let similarity_score = wire
            .similarity_score
            .filter(|s| s.is_finite())
            .unwrap_or(0.0);
        let match_percentage = wire
            .match_percentage
            .filter(|p| p.is_finite())
            .unwrap_or_else(|| (similarity_score * 10_000.0).round() / 100.0);

        CourseRecommendation {
            course_name: wire.course_name.unwrap_or_default(),
            provider: wire.provider.unwrap_or_default(),
            skills_gained: wire.skills_gained.unwrap_or_default(),
            rating: wire.rating.filter(|r| r.is_finite()),
            level_duration: wire.level_duration.unwrap_or_default(),
            course_url: wire.course_url.unwrap_or_default(),
            course_image: wire.course_image.unwrap_or_default(),
            provider_image: wire.provider_image.unwrap_or_default(),
            similarity_score,
            match_percentage,
        }
    }
}

/// FastAPI error body: `{"detail": "..."}`. Validation errors use a list instead.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
