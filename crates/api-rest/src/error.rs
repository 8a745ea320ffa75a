//! HTTP error responses.

use api_shared::ErrorRes;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use medication_core::{ErrorKind, MedicationError};

/// An error ready to be sent to the client as an [`ErrorRes`] envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorRes,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status: status_for(kind),
            body: ErrorRes::new(message, kind.code()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.body = self.body.with_details(details);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Translate a core error.
    ///
    /// Validation violations are always returned. Other diagnostic text is only attached when
    /// `expose_details` is set, i.e. outside production.
    pub fn from_medication_error(err: MedicationError, expose_details: bool) -> Self {
        let kind = err.kind();
        match err {
            MedicationError::Validation(violations) => Self::new(kind, "Validation failed")
                .with_details(serde_json::to_value(violations).unwrap_or_default()),
            err if kind == ErrorKind::Internal => {
                tracing::error!("internal error: {:?}", err);
                let api_err = Self::new(kind, "Internal server error");
                if expose_details {
                    api_err.with_details(serde_json::json!({ "message": err.to_string() }))
                } else {
                    api_err
                }
            }
            err => {
                tracing::warn!("handled error: {}", err);
                Self::new(kind, err.to_string())
            }
        }
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map an extractor rejection to a 400, attaching the parser's text only when
/// `expose_details` is set.
pub trait RejectionExt {
    fn into_api_error(self, expose_details: bool) -> ApiError;
}

impl RejectionExt for JsonRejection {
    fn into_api_error(self, expose_details: bool) -> ApiError {
        rejection_error("Invalid request body", self.body_text(), expose_details)
    }
}

impl RejectionExt for QueryRejection {
    fn into_api_error(self, expose_details: bool) -> ApiError {
        rejection_error("Invalid query string", self.body_text(), expose_details)
    }
}

fn rejection_error(message: &str, detail: String, expose_details: bool) -> ApiError {
    tracing::warn!("rejected request: {}", detail);
    let api_err = ApiError::bad_request(message);
    if expose_details {
        api_err.with_details(serde_json::Value::String(detail))
    } else {
        api_err
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
