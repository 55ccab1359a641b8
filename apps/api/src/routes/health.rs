use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Liveness of this API only; `/api/ml/health` covers the ML service.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "jobsync-api"
    }))
}
