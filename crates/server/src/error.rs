//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// API error response envelope.
///
/// Every failing endpoint answers with this shape so clients can branch
/// on `success` without inspecting status codes.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false for errors.
    pub success: bool,
    /// Human-readable error message.
    pub error: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("storage error: {0}")]
    Storage(#[from] amen_storage::StorageError),

    #[error("metadata error: {0}")]
    Metadata(#[from] amen_metadata::MetadataError),

    #[error("{0}")]
    Core(#[from] amen_core::Error),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Storage(e) => match e {
                amen_storage::StorageError::NotFound(_) => StatusCode::NOT_FOUND,
                amen_storage::StorageError::InvalidKey(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Metadata(e) => match e {
                amen_metadata::MetadataError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Core(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_not_found_maps_to_404() {
        let err = ApiError::Storage(amen_storage::StorageError::NotFound("a.mp3".to_string()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn core_validation_maps_to_400() {
        let err = ApiError::Core(amen_core::Error::InvalidFileName("..".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn envelope_has_success_false() {
        let body = serde_json::to_value(ErrorResponse {
            success: false,
            error: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "boom");
    }
}
