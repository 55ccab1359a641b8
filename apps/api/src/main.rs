use std::net::SocketAddr;

use anyhow::{Context, Result};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobsync_api::config::Config;
use jobsync_api::ml_client::MlClient;
use jobsync_api::review::ReviewProviders;
use jobsync_api::routes::build_router;
use jobsync_api::settings::AiSettings;
use jobsync_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "jobsync_api={level},tower_http={level}",
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobSync API v{}", env!("CARGO_PKG_VERSION"));

    let ml = MlClient::new(&config.ml_service_url, config.ml_service_timeout)
        .context("Failed to initialize ML client")?;
    info!("ML client initialized (service: {})", ml.base_url());

    let ai_settings = AiSettings::load_or_migrate(&config.ai_settings_path)?;
    info!(
        "AI settings loaded (provider: {}, model: {})",
        ai_settings.provider, ai_settings.model
    );

    let reviewers =
        ReviewProviders::from_config(&config).context("Failed to initialize review providers")?;

    let state = AppState {
        ml,
        reviewers,
        ai_settings,
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
