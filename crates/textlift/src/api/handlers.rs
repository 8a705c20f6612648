//! API request handlers.

use axum::{
    Json,
    extract::{Multipart, State},
};
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{
    error::ApiError,
    types::{ApiState, ExtractResponse, HealthResponse},
};

/// RAII guard for automatic temporary file cleanup
struct TempFile {
    path: PathBuf,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        // Best-effort cleanup - use async remove since Drop can't be async
        let path = self.path.clone();
        tokio::spawn(async move {
            let _ = fs::remove_file(&path).await;
        });
    }
}

/// Extract endpoint handler.
///
/// POST /extract
///
/// Accepts multipart form data with:
/// - `file`: The document to extract (PDF, DOCX, or image)
/// - `contentType` (optional): media-type override for the uploaded file
///
/// The upload is staged to a uniquely-named temp file for the duration of the
/// call. Body size limits are enforced at the router layer; an oversized
/// request is rejected with HTTP 413 before this handler runs.
pub async fn extract_handler(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, ApiError> {
    let mut upload: Option<(Vec<u8>, String, Option<String>)> = None;
    let mut content_type_override: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart request: {}", e)))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| ApiError::bad_request("Uploaded file must have a filename"))?;
                let part_content_type = field.content_type().map(|s| s.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read uploaded file: {}", e)))?;

                upload = Some((data.to_vec(), file_name, part_content_type));
            }
            "contentType" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read contentType field: {}", e)))?;
                if !value.trim().is_empty() {
                    content_type_override = Some(value);
                }
            }
            _ => {}
        }
    }

    let Some((data, file_name, part_content_type)) = upload else {
        return Err(ApiError::bad_request("No file provided for extraction"));
    };

    if data.is_empty() {
        return Err(ApiError::bad_request("Uploaded file is empty"));
    }

    // The explicit form field wins over the multipart part's own media type.
    let content_type = content_type_override.or(part_content_type);

    let staged_path = staged_upload_path(&file_name);
    let _staged_guard = TempFile::new(staged_path.clone());
    fs::write(&staged_path, &data)
        .await
        .map_err(|e| ApiError::from(crate::TextliftError::Io(e)))?;

    let result = state
        .extractor
        .extract_file(&staged_path, &file_name, content_type.as_deref())
        .await?;

    let char_count = result.text.chars().count();
    Ok(Json(ExtractResponse {
        kind: result.kind,
        text: result.text,
        char_count,
    }))
}

/// Unique staging path preserving the upload's extension.
fn staged_upload_path(file_name: &str) -> PathBuf {
    let suffix = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    std::env::temp_dir().join(format!("textlift_upload_{}{}", uuid::Uuid::new_v4().simple(), suffix))
}

/// Health check endpoint handler.
///
/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
