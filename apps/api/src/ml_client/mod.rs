//! ML client: the single point of entry for all calls to the ML microservice.
//!
//! ARCHITECTURAL RULE: No other module may talk to the ML service directly or
//! know its wire format. Handlers receive domain models from here.
//!
//! No call is retried. Retry policy, if any, belongs to the caller.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{CourseRecommendation, JobAnalysisResult, SkillComparison, SkillSet};

mod wire;

use wire::{
    AnalyzeJobRequest, AnalyzeJobResponse, CompareSkillsRequest, CompareSkillsResponse,
    CourseListResponse, ErrorBody, RecommendCoursesRequest, SearchCoursesRequest,
    SkillExtractionResponse, TextRequest,
};

const EXTRACT_SKILLS_ENDPOINT: &str = "/api/extract-skills";
const EXTRACT_SKILLS_FROM_FILE_ENDPOINT: &str = "/api/extract-skills-from-pdf";
const COMPARE_SKILLS_ENDPOINT: &str = "/api/compare-skills";
const RECOMMEND_COURSES_ENDPOINT: &str = "/api/recommend-courses";
const ANALYZE_JOB_ENDPOINT: &str = "/api/analyze-job";
const SEARCH_COURSES_ENDPOINT: &str = "/api/search-courses";
const COURSES_BY_SKILL_ENDPOINT: &str = "/api/courses/by-skill";
const HEALTH_ENDPOINT: &str = "/health";

/// Default result size for recommend/search/analyze calls.
pub const DEFAULT_TOP_N: usize = 10;
/// Default result size for the per-skill course lookup.
pub const DEFAULT_BY_SKILL_TOP_N: usize = 5;

#[derive(Debug, Error)]
pub enum MlError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid ML service URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error(
        "ML service is unreachable at {url}. Please make sure the ML service is running and ML_SERVICE_URL is correct"
    )]
    ServiceUnavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("ML Service error (status {status}): {message}")]
    ServiceError { status: u16, message: String },

    #[error("Invalid response from ML service: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Typed client for the ML microservice.
#[derive(Clone)]
pub struct MlClient {
    client: Client,
    base_url: String,
}

impl MlClient {
    /// `timeout` of `None` keeps the transport default.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, MlError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        let parsed = Url::parse(&base_url).map_err(|e| MlError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(MlError::InvalidBaseUrl {
                url: base_url,
                reason: "scheme must be http or https".to_string(),
            });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(MlError::ClientBuild)?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Extracts a normalized skill set from resume or job-description text.
    pub async fn extract_skills(&self, text: &str) -> Result<SkillSet, MlError> {
        require_non_blank(text, "text")?;

        let response: SkillExtractionResponse = self
            .post_json(EXTRACT_SKILLS_ENDPOINT, &TextRequest { text })
            .await?;

        let skills = SkillSet::from(response.skills);
        debug!("Extracted {} skills from {} chars of text", skills.len(), text.len());
        Ok(skills)
    }

    /// Uploads a document (PDF or DOCX) and extracts its skills.
    /// Multipart encoding stays inside the adapter.
    pub async fn extract_skills_from_file(
        &self,
        content: Vec<u8>,
        file_name: &str,
    ) -> Result<SkillSet, MlError> {
        if content.is_empty() {
            return Err(MlError::InvalidInput("file is empty".to_string()));
        }

        let part = Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str(content_type_for(file_name))
            .map_err(|e| MlError::InvalidInput(format!("invalid file content type: {e}")))?;
        let form = Form::new().part("file", part);

        info!("Uploading {} to ML service for skill extraction", file_name);

        let request = self
            .client
            .post(self.url(EXTRACT_SKILLS_FROM_FILE_ENDPOINT))
            .multipart(form);
        let response: SkillExtractionResponse = self.fetch(request).await?;

        Ok(SkillSet::from(response.skills))
    }

    /// Set arithmetic is done upstream; this only marshals and normalizes.
    pub async fn compare_skills(
        &self,
        resume_skills: &SkillSet,
        job_skills: &SkillSet,
    ) -> Result<SkillComparison, MlError> {
        let body = CompareSkillsRequest {
            resume_skills: resume_skills.iter().collect(),
            job_skills: job_skills.iter().collect(),
        };

        let response: CompareSkillsResponse =
            self.post_json(COMPARE_SKILLS_ENDPOINT, &body).await?;

        Ok(response.comparison.into())
    }

    /// Courses covering `missing_skills`, ranked, at most `top_n`.
    ///
    /// An empty skill set needs no courses: returns `[]` without a network call.
    pub async fn recommend_courses(
        &self,
        missing_skills: &SkillSet,
        top_n: usize,
    ) -> Result<Vec<CourseRecommendation>, MlError> {
        if missing_skills.is_empty() {
            debug!("No missing skills, skipping course recommendation call");
            return Ok(Vec::new());
        }

        let body = RecommendCoursesRequest {
            missing_skills: missing_skills.iter().collect(),
            top_n,
        };

        let response: CourseListResponse =
            self.post_json(RECOMMEND_COURSES_ENDPOINT, &body).await?;

        Ok(rank(response, top_n))
    }

    /// Extraction, comparison and recommendation in one upstream round trip.
    pub async fn analyze_job(
        &self,
        job_description: &str,
        resume_skills: &SkillSet,
        top_n: usize,
    ) -> Result<JobAnalysisResult, MlError> {
        require_non_blank(job_description, "job description")?;

        let body = AnalyzeJobRequest {
            job_description,
            resume_skills: resume_skills.iter().collect(),
            top_n,
        };

        let response: AnalyzeJobResponse = self.post_json(ANALYZE_JOB_ENDPOINT, &body).await?;

        let result = JobAnalysisResult::new(
            response.skill_analysis.into(),
            response
                .recommended_courses
                .into_iter()
                .map(CourseRecommendation::from)
                .collect(),
            top_n,
        );

        info!(
            "Job analysis: {}/{} required skills matched, {} courses",
            result.skill_analysis.total_matched,
            result.skill_analysis.total_required,
            result.recommended_courses.len()
        );
        Ok(result)
    }

    /// Free-text course search, ranked, at most `top_n`.
    pub async fn search_courses(
        &self,
        query: &str,
        top_n: usize,
    ) -> Result<Vec<CourseRecommendation>, MlError> {
        require_non_blank(query, "query")?;

        let response: CourseListResponse = self
            .post_json(SEARCH_COURSES_ENDPOINT, &SearchCoursesRequest { query, top_n })
            .await?;

        Ok(rank(response, top_n))
    }

    /// Courses teaching one skill. The skill is percent-encoded as a path segment.
    pub async fn courses_by_skill(
        &self,
        skill: &str,
        top_n: usize,
    ) -> Result<Vec<CourseRecommendation>, MlError> {
        require_non_blank(skill, "skill")?;

        let endpoint = self.url(COURSES_BY_SKILL_ENDPOINT);
        let mut url = Url::parse(&endpoint).map_err(|e| MlError::InvalidBaseUrl {
            url: endpoint.clone(),
            reason: e.to_string(),
        })?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| MlError::InvalidBaseUrl {
                url: endpoint.clone(),
                reason: "URL cannot have path segments".to_string(),
            })?;
            segments.push(skill.trim());
        }
        url.query_pairs_mut()
            .append_pair("top_n", &top_n.to_string());

        let response: CourseListResponse = self.fetch(self.client.get(url)).await?;

        Ok(rank(response, top_n))
    }

    /// Liveness check. The payload is opaque and must not drive business logic.
    pub async fn health_check(&self) -> Result<serde_json::Value, MlError> {
        self.fetch(self.client.get(self.url(HEALTH_ENDPOINT))).await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn post_json<T, R>(&self, endpoint: &str, payload: &T) -> Result<R, MlError>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let request = self.client.post(self.url(endpoint)).json(payload);
        self.fetch(request).await
    }

    /// Sends the request and decodes a 2xx JSON body.
    async fn fetch<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R, MlError> {
        let response = self.send(request).await?;

        let body = response.bytes().await.map_err(|source| {
            warn!("Reading ML service response failed: {}", source);
            MlError::ServiceUnavailable {
                url: self.base_url.clone(),
                source,
            }
        })?;

        Ok(serde_json::from_slice(&body)?)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, MlError> {
        let response = request.send().await.map_err(|source| {
            warn!("ML service request failed: {}", source);
            MlError::ServiceUnavailable {
                url: self.base_url.clone(),
                source,
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let reason = status.canonical_reason().unwrap_or("Unknown status");
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error) => format!("{reason}: {}", error.message()),
            Err(_) => reason.to_string(),
        };

        warn!("ML service returned {}: {}", status, body);
        Err(MlError::ServiceError {
            status: status.as_u16(),
            message,
        })
    }
}

fn rank(response: CourseListResponse, top_n: usize) -> Vec<CourseRecommendation> {
    crate::models::rank_courses(
        response
            .courses
            .into_iter()
            .map(CourseRecommendation::from)
            .collect(),
        top_n,
    )
}

fn require_non_blank(value: &str, what: &str) -> Result<(), MlError> {
    if value.trim().is_empty() {
        return Err(MlError::InvalidInput(format!("{what} cannot be empty")));
    }
    Ok(())
}

/// Guesses the multipart content type from the file extension.
fn content_type_for(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else {
        "application/octet-stream"
    }
}
