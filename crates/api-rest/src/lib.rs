//! # API REST
//!
//! REST API for the medication service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, CORS, request tracing, API key checks)
//!
//! Uses `api-shared` for common wire types and `medication-core` for everything else.

#![warn(rust_2018_idioms)]

pub mod error;
mod handlers;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use medication_core::constants::API_KEY_HEADER;
use medication_core::{CoreConfig, MedicationError, MedicationService};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;
use error::RejectionExt;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    service: MedicationService,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>, service: MedicationService) -> Self {
        Self { cfg, service }
    }

    pub fn service(&self) -> &MedicationService {
        &self.service
    }

    /// Translate a core error, exposing diagnostics outside production only.
    pub(crate) fn fail(&self, err: MedicationError) -> ApiError {
        ApiError::from_medication_error(err, self.expose_details())
    }

    /// Translate an extractor rejection under the same exposure rule as [`AppState::fail`].
    pub(crate) fn reject(&self, rejection: impl RejectionExt) -> ApiError {
        rejection.into_api_error(self.expose_details())
    }

    fn expose_details(&self) -> bool {
        !self.cfg.environment().is_production()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::create_medication,
        handlers::list_medications,
        handlers::search_medications,
        handlers::get_medication,
        handlers::update_medication,
        handlers::delete_medication,
        handlers::extract_indications,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::ErrorRes,
        api_shared::ExtractIndicationsReq,
        medication_core::Medication,
        medication_core::NewMedication,
        medication_core::MedicationPatch,
        medication_core::Indication,
        medication_core::Candidate,
        medication_core::validation::FieldViolation,
    ))
)]
pub struct ApiDoc;

/// Build the full application router.
///
/// Medication routes live under `/api/medications` and are guarded by the API key check when a
/// key is configured; `/api/health`, `/swagger-ui` and `/api-docs/openapi.json` stay open.
pub fn build_app(state: AppState) -> Router {
    let medications = Router::new()
        .route(
            "/medications",
            get(handlers::list_medications).post(handlers::create_medication),
        )
        .route("/medications/search", get(handlers::search_medications))
        .route(
            "/medications/extract-indications",
            post(handlers::extract_indications),
        )
        .route(
            "/medications/:id",
            get(handlers::get_medication)
                .put(handlers::update_medication)
                .delete(handlers::delete_medication),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    let api = Router::new()
        .route("/health", get(handlers::health))
        .merge(medications);

    Router::new()
        .nest("/api", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match api_shared::auth::validate_api_key(state.cfg.api_key(), provided) {
        Ok(()) => next.run(request).await,
        Err(e) => state.fail(e).into_response(),
    }
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Not Found")
}
