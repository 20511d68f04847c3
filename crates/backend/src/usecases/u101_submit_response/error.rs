use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures of the submission pipeline before (and including) the durable
/// write. Everything after the write is degraded success, not an error.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Form not found")]
    FormNotFound,

    #[error("Response data is required")]
    EmptyPayload,

    #[error("Failed to store response")]
    Persistence(#[source] anyhow::Error),
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        let status = match self {
            SubmitError::FormNotFound => StatusCode::NOT_FOUND,
            SubmitError::EmptyPayload => StatusCode::BAD_REQUEST,
            SubmitError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
