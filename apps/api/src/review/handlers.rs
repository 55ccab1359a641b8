use std::convert::Infallible;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use super::AiModel;
use crate::errors::AppError;
use crate::ml::requests::json_body;
use crate::models::Resume;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub resume: Option<Resume>,
    pub selected_model: Option<AiModel>,
}

impl ReviewRequest {
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        serde_json::from_value(body)
            .map_err(|e| AppError::Validation(format!("Invalid review request: {e}")))
    }
}

/// POST /api/ai/resume/review
///
/// Streams the review as Server-Sent Events: one `data` event per text chunk.
/// A failure after streaming has started is sent as an `error` event.
pub async fn handle_review_resume(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let request = ReviewRequest::from_body(json_body(payload)?)?;

    let resume = request
        .resume
        .filter(|resume| !resume.is_empty())
        .ok_or_else(|| AppError::Validation("Resume is required".to_string()))?;
    let selected = request
        .selected_model
        .unwrap_or_else(|| state.ai_settings.selected_model());
    if selected.model.trim().is_empty() {
        return Err(AppError::Validation("Model is required".to_string()));
    }

    info!(
        "Reviewing resume with {} model {}",
        selected.provider, selected.model
    );

    let chunks = state
        .reviewers
        .for_provider(selected.provider)
        .generate_review(&resume, selected.model.trim())
        .await?;

    let events = chunks.map(|chunk| {
        Ok::<_, Infallible>(match chunk {
            Ok(text) => Event::default().data(text),
            Err(e) => {
                error!("Resume review stream failed: {e}");
                Event::default().event("error").data(e.to_string())
            }
        })
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
