//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::types::ErrorResponse;
use crate::TextliftError;

/// Library or boundary error carried to the HTTP layer.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error_type: &'static str,
    message: String,
}

impl ApiError {
    /// Client-side request framing problem (400).
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error_type: "bad_request",
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<TextliftError> for ApiError {
    fn from(err: TextliftError) -> Self {
        let (status, error_type) = match &err {
            TextliftError::UnsupportedFormat(_) => (StatusCode::BAD_REQUEST, "unsupported_format"),
            TextliftError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation"),
            TextliftError::NoReadableText => (StatusCode::UNPROCESSABLE_ENTITY, "no_readable_text"),
            TextliftError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io"),
            TextliftError::Parsing { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "parsing"),
            TextliftError::Ocr { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "ocr"),
            TextliftError::ImageProcessing { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "image_processing"),
            TextliftError::MissingDependency(_) => (StatusCode::INTERNAL_SERVER_ERROR, "missing_dependency"),
        };

        Self {
            status,
            error_type,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error_type = self.error_type, message = %self.message, "extraction request failed");
        }

        let body = ErrorResponse {
            error_type: self.error_type.to_string(),
            message: self.message,
            status_code: self.status.as_u16(),
        };

        (self.status, Json(body)).into_response()
    }
}
