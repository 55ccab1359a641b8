use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ml_client::MlError;
use crate::review::ReviewError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Body shapes:
/// - validation failures: `400 {"error": message}`, no upstream call was made
/// - oversized uploads: `413 {"error": message}`
/// - ML service failures: `500 {"error": message, "details": cause}`
/// - everything else: `500 {"error": message}`
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: MlError,
    },

    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wraps an adapter failure with the route's failure message,
    /// e.g. `"Failed to analyze job"`.
    pub fn upstream(context: &'static str, source: MlError) -> Self {
        AppError::Upstream { context, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, json!({ "error": msg }))
            }
            // Adapter-side precondition failures are the caller's fault.
            AppError::Upstream {
                source: MlError::InvalidInput(msg),
                ..
            } => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Upstream { context, source } => {
                tracing::error!("{context}: {source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": self.to_string(),
                        "details": cause_chain(source),
                    }),
                )
            }
            AppError::Review(e) => {
                tracing::error!("Resume review error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": e.to_string() }),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal server error occurred" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Underlying causes of `err` joined with ": ", or `err` itself when it has none.
fn cause_chain(err: &dyn std::error::Error) -> String {
    let mut causes = Vec::new();
    let mut current = err.source();
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }

    if causes.is_empty() {
        err.to_string()
    } else {
        causes.join(": ")
    }
}
