//! Request-shape validation for the ML proxy routes.
//!
//! Bodies are taken as raw JSON so that malformed JSON, missing fields and
//! wrong types all become a 400 with a readable message. Field names follow
//! the front end's camelCase.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

use crate::errors::AppError;
use crate::ml_client::DEFAULT_TOP_N;
use crate::models::SkillSet;

#[derive(Debug)]
pub struct ExtractSkillsInput {
    pub text: String,
}

#[derive(Debug)]
pub struct CompareSkillsInput {
    pub resume_skills: SkillSet,
    pub job_skills: SkillSet,
}

#[derive(Debug)]
pub struct AnalyzeJobInput {
    pub job_description: String,
    pub resume_skills: SkillSet,
    pub top_n: usize,
}

#[derive(Debug)]
pub struct RecommendCoursesInput {
    pub missing_skills: SkillSet,
    pub top_n: usize,
}

#[derive(Debug)]
pub struct SearchCoursesInput {
    pub query: String,
    pub top_n: usize,
}

impl ExtractSkillsInput {
    pub fn from_body(body: &Value) -> Result<Self, AppError> {
        Ok(Self {
            text: required_text(body, "text", "Text is required")?,
        })
    }
}

impl CompareSkillsInput {
    pub fn from_body(body: &Value) -> Result<Self, AppError> {
        Ok(Self {
            resume_skills: skill_list(body, "resumeSkills", "Resume skills array is required")?,
            job_skills: skill_list(body, "jobSkills", "Job skills array is required")?,
        })
    }
}

impl AnalyzeJobInput {
    pub fn from_body(body: &Value) -> Result<Self, AppError> {
        Ok(Self {
            job_description: required_text(body, "jobDescription", "Job description is required")?,
            resume_skills: skill_list(body, "resumeSkills", "Resume skills array is required")?,
            top_n: top_n(body, DEFAULT_TOP_N)?,
        })
    }
}

impl RecommendCoursesInput {
    pub fn from_body(body: &Value) -> Result<Self, AppError> {
        Ok(Self {
            missing_skills: skill_list(body, "missingSkills", "Missing skills array is required")?,
            top_n: top_n(body, DEFAULT_TOP_N)?,
        })
    }
}

impl SearchCoursesInput {
    pub fn from_body(body: &Value) -> Result<Self, AppError> {
        Ok(Self {
            query: required_text(body, "query", "Search query is required")?,
            top_n: top_n(body, DEFAULT_TOP_N)?,
        })
    }
}

/// Unwraps the JSON extractor, turning a rejection into a 400.
pub fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::Validation(format!("Invalid JSON body: {}", rejection.body_text())))
}

/// Parses a `topN` given as a query-string value.
pub fn top_n_param(raw: Option<&str>, default: usize) -> Result<usize, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse::<usize>().map_err(|_| invalid_top_n()),
    }
}

fn required_text(body: &Value, field: &str, message: &str) -> Result<String, AppError> {
    match body.get(field) {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.clone()),
        _ => Err(AppError::Validation(message.to_string())),
    }
}

fn skill_list(body: &Value, field: &str, message: &str) -> Result<SkillSet, AppError> {
    let Some(Value::Array(items)) = body.get(field) else {
        return Err(AppError::Validation(message.to_string()));
    };

    items
        .iter()
        .map(|item| {
            item.as_str()
                .ok_or_else(|| AppError::Validation(format!("{field} must contain only strings")))
        })
        .collect()
}

fn top_n(body: &Value, default: usize) -> Result<usize, AppError> {
    match body.get("topN") {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(invalid_top_n),
    }
}

fn invalid_top_n() -> AppError {
    AppError::Validation("topN must be a non-negative integer".to_string())
}
