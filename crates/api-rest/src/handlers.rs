//! Route handlers.
//!
//! Each handler validates its input, calls one
//! [`MedicationService`](medication_core::MedicationService) operation and shapes the result.
//! "Not found" from the service becomes a 404 here.

use crate::{ApiError, AppState};
use api_shared::{ErrorRes, ExtractIndicationsReq, HealthRes, HealthService, SearchParams};
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use medication_core::validation::{validate_medication_patch, validate_new_medication};
use medication_core::{Candidate, Medication, MedicationPatch, NewMedication};

const NOT_FOUND_MESSAGE: &str = "Medication not found";

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint used by monitoring and load balancers.
pub(crate) async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/api/medications",
    request_body = NewMedication,
    responses(
        (status = 201, description = "Medication created", body = Medication),
        (status = 400, description = "Validation failed", body = ErrorRes),
        (status = 401, description = "Missing or invalid API key", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Create a new medication record.
///
/// Surrounding whitespace is stripped from text fields before the bounds are checked.
#[axum::debug_handler]
pub(crate) async fn create_medication(
    State(state): State<AppState>,
    payload: Result<Json<NewMedication>, JsonRejection>,
) -> Result<(StatusCode, Json<Medication>), ApiError> {
    let Json(mut input) = payload.map_err(|r| state.reject(r))?;
    input.normalise();
    validate_new_medication(&input).map_err(|e| state.fail(e))?;

    let created = state
        .service()
        .create(input)
        .await
        .map_err(|e| state.fail(e))?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/medications",
    responses(
        (status = 200, description = "All medications", body = [Medication]),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List every medication record.
#[axum::debug_handler]
pub(crate) async fn list_medications(
    State(state): State<AppState>,
) -> Result<Json<Vec<Medication>>, ApiError> {
    let medications = state.service().get_all().await.map_err(|e| state.fail(e))?;
    Ok(Json(medications))
}

#[utoipa::path(
    get,
    path = "/api/medications/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching medications", body = [Medication]),
        (status = 400, description = "Missing query parameter", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Search medications by name, description or indication.
#[axum::debug_handler]
pub(crate) async fn search_medications(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Medication>>, ApiError> {
    let Query(params) = params.map_err(|r| state.reject(r))?;
    let query = params
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("Query parameter \"q\" is required"))?;

    let medications = state
        .service()
        .search(&query)
        .await
        .map_err(|e| state.fail(e))?;
    Ok(Json(medications))
}

#[utoipa::path(
    get,
    path = "/api/medications/{id}",
    params(("id" = String, Path, description = "Medication id")),
    responses(
        (status = 200, description = "Medication found", body = Medication),
        (status = 404, description = "Medication not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Fetch one medication record.
#[axum::debug_handler]
pub(crate) async fn get_medication(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Medication>, ApiError> {
    state
        .service()
        .get_by_id(&id)
        .await
        .map_err(|e| state.fail(e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND_MESSAGE))
}

#[utoipa::path(
    put,
    path = "/api/medications/{id}",
    params(("id" = String, Path, description = "Medication id")),
    request_body = MedicationPatch,
    responses(
        (status = 200, description = "Medication updated", body = Medication),
        (status = 400, description = "Validation failed", body = ErrorRes),
        (status = 404, description = "Medication not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Partially update a medication record. Absent fields keep their stored value.
#[axum::debug_handler]
pub(crate) async fn update_medication(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MedicationPatch>, JsonRejection>,
) -> Result<Json<Medication>, ApiError> {
    let Json(mut patch) = payload.map_err(|r| state.reject(r))?;
    patch.normalise();
    validate_medication_patch(&patch).map_err(|e| state.fail(e))?;

    state
        .service()
        .update(&id, patch)
        .await
        .map_err(|e| state.fail(e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND_MESSAGE))
}

#[utoipa::path(
    delete,
    path = "/api/medications/{id}",
    params(("id" = String, Path, description = "Medication id")),
    responses(
        (status = 204, description = "Medication deleted"),
        (status = 404, description = "Medication not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Delete a medication record.
#[axum::debug_handler]
pub(crate) async fn delete_medication(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .service()
        .delete(&id)
        .await
        .map_err(|e| state.fail(e))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(NOT_FOUND_MESSAGE))
    }
}

#[utoipa::path(
    post,
    path = "/api/medications/extract-indications",
    request_body = ExtractIndicationsReq,
    responses(
        (status = 200, description = "Ranked ICD-10 candidates", body = [Candidate]),
        (status = 400, description = "Missing text", body = ErrorRes)
    )
)]
/// Map free text to ranked ICD-10 candidates.
#[axum::debug_handler]
pub(crate) async fn extract_indications(
    State(state): State<AppState>,
    payload: Result<Json<ExtractIndicationsReq>, JsonRejection>,
) -> Result<Json<Vec<Candidate>>, ApiError> {
    let Json(req) = payload.map_err(|r| state.reject(r))?;
    let text = req
        .text
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Text is required"))?;

    Ok(Json(state.service().extract_and_map_indications(&text)))
}
