use crate::ml_client::MlClient;
use crate::review::ReviewProviders;
use crate::settings::AiSettings;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every field is an immutable handle; nothing is shared mutably across requests.
#[derive(Clone)]
pub struct AppState {
    pub ml: MlClient,
    /// One review backend per `AiProvider` variant.
    pub reviewers: ReviewProviders,
    /// Loaded (and migrated) once at startup. Supplies the default review model.
    pub ai_settings: AiSettings,
}
