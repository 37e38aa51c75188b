use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::error::{StoreError, WorkflowError};

/// Errors returned by HTTP handlers, rendered as
/// `{"error": {"code": <status>, "message": <text>}}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A workflow command outside the allowed-actions table.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => Self::NotFound(e.to_string()),
            StoreError::DuplicateId(_) => Self::Conflict(e.to_string()),
            StoreError::Workflow(WorkflowError::Validation(v)) => Self::Validation(v.to_string()),
            StoreError::Workflow(w @ WorkflowError::IllegalTransition { .. }) => {
                Self::Conflict(w.to_string())
            }
            StoreError::Workflow(w @ WorkflowError::NotPermitted { .. }) => {
                Self::Forbidden(w.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
        };
        if status.is_client_error() && status != StatusCode::NOT_FOUND {
            tracing::warn!("Request rejected: {}", self);
        }
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}
