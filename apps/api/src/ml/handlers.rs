//! Axum route handlers for the ML proxy API.
//!
//! Each handler validates the request shape, delegates to `MlClient` and
//! wraps the normalized result as `{"success": true, ...data}`. No caching,
//! rate limiting or retries happen here.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::ml::requests::{
    json_body, top_n_param, AnalyzeJobInput, CompareSkillsInput, ExtractSkillsInput,
    RecommendCoursesInput, SearchCoursesInput,
};
use crate::ml_client::DEFAULT_BY_SKILL_TOP_N;
use crate::models::{CourseRecommendation, JobAnalysisResult, SkillComparison, SkillSet};
use crate::state::AppState;

pub const NO_MISSING_SKILLS_MESSAGE: &str = "No missing skills provided";

/// Upper bound for resume uploads to the file skill-extraction route.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

/// Success envelope: `{"success": true}` merged with the payload's fields.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Success<T> {
    fn json(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SkillsPayload {
    pub skills: SkillSet,
    pub count: usize,
}

impl From<SkillSet> for SkillsPayload {
    fn from(skills: SkillSet) -> Self {
        Self {
            count: skills.len(),
            skills,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ComparisonPayload {
    pub comparison: SkillComparison,
}

#[derive(Debug, Serialize)]
pub struct CoursesPayload {
    pub courses: Vec<CourseRecommendation>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl From<Vec<CourseRecommendation>> for CoursesPayload {
    fn from(courses: Vec<CourseRecommendation>) -> Self {
        Self {
            count: courses.len(),
            courses,
            message: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SkillCoursesPayload {
    pub skill: String,
    pub courses: Vec<CourseRecommendation>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthPayload {
    pub ml_service: Value,
}

#[derive(Debug, Deserialize)]
pub struct TopNQuery {
    #[serde(rename = "topN")]
    pub top_n: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/ml/extract-skills
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Success<SkillsPayload>>, AppError> {
    let input = ExtractSkillsInput::from_body(&json_body(payload)?)?;

    let skills = state
        .ml
        .extract_skills(&input.text)
        .await
        .map_err(|e| AppError::upstream("Failed to extract skills", e))?;

    Ok(Success::json(skills.into()))
}

/// POST /api/ml/extract-skills-from-file
///
/// Multipart upload with a single `file` part (PDF or DOCX).
pub async fn handle_extract_skills_from_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Success<SkillsPayload>>, AppError> {
    let mut multipart = multipart
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e.body_text())))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error("Invalid multipart body", e))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.pdf").to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| upload_error("Failed to read uploaded file", e))?;
        upload = Some((file_name, content));
        break;
    }

    let (file_name, content) =
        upload.ok_or_else(|| AppError::Validation("File is required".to_string()))?;
    if content.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    info!("Received {} ({} bytes) for skill extraction", file_name, content.len());

    let skills = state
        .ml
        .extract_skills_from_file(content.to_vec(), &file_name)
        .await
        .map_err(|e| AppError::upstream("Failed to extract skills from file", e))?;

    Ok(Success::json(skills.into()))
}

/// Body-limit overruns become a 413; anything else is a malformed upload.
fn upload_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Uploaded file exceeds the {} MiB limit",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        ))
    } else {
        AppError::Validation(format!("{context}: {}", err.body_text()))
    }
}

/// POST /api/ml/compare-skills
pub async fn handle_compare_skills(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Success<ComparisonPayload>>, AppError> {
    let input = CompareSkillsInput::from_body(&json_body(payload)?)?;

    let comparison = state
        .ml
        .compare_skills(&input.resume_skills, &input.job_skills)
        .await
        .map_err(|e| AppError::upstream("Failed to compare skills", e))?;

    Ok(Success::json(ComparisonPayload { comparison }))
}

/// POST /api/ml/analyze-job
///
/// Skill-gap analysis of a job description plus course recommendations.
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Success<JobAnalysisResult>>, AppError> {
    let input = AnalyzeJobInput::from_body(&json_body(payload)?)?;

    let analysis = state
        .ml
        .analyze_job(&input.job_description, &input.resume_skills, input.top_n)
        .await
        .map_err(|e| AppError::upstream("Failed to analyze job", e))?;

    Ok(Success::json(analysis))
}

/// POST /api/ml/recommend-courses
///
/// Short-circuits with an explicit empty result when no skills are missing.
pub async fn handle_recommend_courses(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Success<CoursesPayload>>, AppError> {
    let input = RecommendCoursesInput::from_body(&json_body(payload)?)?;

    if input.missing_skills.is_empty() {
        return Ok(Success::json(CoursesPayload {
            courses: Vec::new(),
            count: 0,
            message: Some(NO_MISSING_SKILLS_MESSAGE),
        }));
    }

    let courses = state
        .ml
        .recommend_courses(&input.missing_skills, input.top_n)
        .await
        .map_err(|e| AppError::upstream("Failed to recommend courses", e))?;

    Ok(Success::json(courses.into()))
}

/// POST /api/ml/search-courses
pub async fn handle_search_courses(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Success<CoursesPayload>>, AppError> {
    let input = SearchCoursesInput::from_body(&json_body(payload)?)?;

    let courses = state
        .ml
        .search_courses(&input.query, input.top_n)
        .await
        .map_err(|e| AppError::upstream("Failed to search courses", e))?;

    Ok(Success::json(courses.into()))
}

/// GET /api/ml/courses/by-skill/:skill?topN=5
pub async fn handle_courses_by_skill(
    State(state): State<AppState>,
    Path(skill): Path<String>,
    query: Result<Query<TopNQuery>, QueryRejection>,
) -> Result<Json<Success<SkillCoursesPayload>>, AppError> {
    let Query(query) = query
        .map_err(|e| AppError::Validation(format!("Invalid query string: {}", e.body_text())))?;
    let skill = skill.trim().to_string();
    if skill.is_empty() {
        return Err(AppError::Validation("Skill is required".to_string()));
    }
    let top_n = top_n_param(query.top_n.as_deref(), DEFAULT_BY_SKILL_TOP_N)?;

    let courses = state
        .ml
        .courses_by_skill(&skill, top_n)
        .await
        .map_err(|e| AppError::upstream("Failed to get courses for skill", e))?;

    Ok(Success::json(SkillCoursesPayload {
        skill,
        count: courses.len(),
        courses,
    }))
}

/// GET /api/ml/health
///
/// Proxies the ML service liveness payload unchanged.
pub async fn handle_ml_health(
    State(state): State<AppState>,
) -> Result<Json<Success<HealthPayload>>, AppError> {
    let ml_service = state
        .ml
        .health_check()
        .await
        .map_err(|e| AppError::upstream("ML service health check failed", e))?;

    Ok(Success::json(HealthPayload { ml_service }))
}
