//! API request and response types.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::extractor::Extractor;
use crate::core::kind::FileKind;

/// API server size limit configuration.
///
/// Default limit is 50 MB for both the whole request body and individual
/// multipart fields. Override at runtime with `TEXTLIFT_MAX_UPLOAD_SIZE_MB`.
///
/// # Examples
///
/// ```
/// use textlift::api::ApiSizeLimits;
///
/// // Default limits (50 MB)
/// let limits = ApiSizeLimits::default();
///
/// // 200 MB limits
/// let limits = ApiSizeLimits::from_mb(200);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ApiSizeLimits {
    /// Maximum size of the entire request body in bytes.
    pub max_request_body_bytes: usize,
}

impl Default for ApiSizeLimits {
    fn default() -> Self {
        Self::from_mb(50)
    }
}

impl ApiSizeLimits {
    /// Create size limits from an MB value.
    pub fn from_mb(max_upload_mb: usize) -> Self {
        Self {
            max_request_body_bytes: max_upload_mb * 1024 * 1024,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// API version
    pub version: String,
}

/// Successful extraction response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    /// Detected file kind
    pub kind: FileKind,
    /// Normalized plain text
    pub text: String,
    /// Character count of `text`
    pub char_count: usize,
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type name
    pub error_type: String,
    /// Error message
    pub message: String,
    /// HTTP status code
    pub status_code: u16,
}

/// API server state.
#[derive(Clone)]
pub struct ApiState {
    /// Shared extraction pipeline
    pub extractor: Arc<Extractor>,
}
