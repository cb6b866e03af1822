use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use recite_core::{ExtractionError, ValidationError};
use serde_json::json;

/// Everything a handler can fail with, mapped onto an HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("{reason}")]
    InvalidDocument {
        reason: ValidationError,
        suggestion: Option<String>,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Extraction(ExtractionError::UnsupportedFormat { .. }) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            ApiError::Extraction(ExtractionError::DependencyMissing { .. }) => {
                StatusCode::NOT_IMPLEMENTED
            }
            ApiError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidDocument { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the log; the client gets a generic line.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self, "request failed");
            return (status, Json(json!({ "error": "internal server error" }))).into_response();
        }

        let mut body = json!({ "error": self.to_string() });
        if let ApiError::InvalidDocument {
            suggestion: Some(suggestion),
            ..
        } = &self
        {
            body["suggestion"] = json!(suggestion);
        }
        (status, Json(body)).into_response()
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ApiError::BadRequest(format!("invalid multipart request: {err}"))
    }
}
