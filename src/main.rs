use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, build_app};
use medication_core::{CoreConfig, MedicationService, build_repository};

/// Main entry point for the medication service
///
/// Serves the REST API (and its Swagger UI) on a single listener until Ctrl-C.
///
/// # Environment Variables
/// - `MEDICATION_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MEDICATION_ENV`: development, test, staging or production (default: development)
/// - `MEDICATION_STORAGE`: `memory` or `file` (default: memory)
/// - `MEDICATION_DATA_DIR`: Root directory for the file backend (default: "medication_data")
/// - `API_KEY`: When set, required in the `x-api-key` header of medication routes
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, storage or the listener fail
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medication_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("medication_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(CoreConfig::from_env()?);
    let repository = build_repository(&cfg)?;
    let service = MedicationService::new(repository);

    let app = build_app(AppState::new(cfg.clone(), service));

    let listener = tokio::net::TcpListener::bind(cfg.rest_addr()).await?;
    tracing::info!(
        "++ Starting medication REST on {} ({} environment, {:?} storage)",
        listener.local_addr()?,
        cfg.environment(),
        cfg.storage()
    );
    if cfg.api_key().is_none() {
        tracing::warn!("API_KEY is not set; medication routes are unauthenticated");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Medication REST stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
