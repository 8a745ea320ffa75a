//! Request and response bodies that only exist at the API boundary.
//!
//! Domain types (`Medication`, `Candidate`, ...) are serialised directly from
//! `medication-core`; this module holds the envelopes around them.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Error envelope returned for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    /// Always `"error"`.
    pub status: String,
    pub message: String,
    /// Machine-readable category such as `NOT_FOUND` or `BAD_REQUEST`.
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

impl ErrorRes {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status: "error".into(),
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Body of `POST /api/medications/extract-indications`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExtractIndicationsReq {
    #[serde(default)]
    pub text: Option<String>,
}

/// Query string of `GET /api/medications/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive text matched against name, description and indications.
    #[serde(default)]
    pub q: Option<String>,
}
