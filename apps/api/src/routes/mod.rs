pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ml::handlers as ml;
use crate::review::handlers as review;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // ML proxy API
        .route("/api/ml/extract-skills", post(ml::handle_extract_skills))
        .route(
            "/api/ml/extract-skills-from-file",
            post(ml::handle_extract_skills_from_file)
                .layer(DefaultBodyLimit::max(ml::MAX_UPLOAD_BYTES)),
        )
        .route("/api/ml/compare-skills", post(ml::handle_compare_skills))
        .route("/api/ml/analyze-job", post(ml::handle_analyze_job))
        .route("/api/ml/recommend-courses", post(ml::handle_recommend_courses))
        .route("/api/ml/search-courses", post(ml::handle_search_courses))
        .route(
            "/api/ml/courses/by-skill/:skill",
            get(ml::handle_courses_by_skill),
        )
        .route("/api/ml/health", get(ml::handle_ml_health))
        // AI review API
        .route("/api/ai/resume/review", post(review::handle_review_resume))
        .with_state(state)
}
