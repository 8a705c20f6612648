//! File-kind detection.
//!
//! Classifies an upload into one of the three supported kinds from its file
//! name and an optional caller-supplied content-type hint. The hint wins over
//! the extension when both are present.

use crate::{Result, TextliftError};
use serde::Serialize;

pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const DOCX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// The three document kinds the pipeline handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Docx,
    Image,
}

impl FileKind {
    /// Lowercase wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Docx => "docx",
            FileKind::Image => "image",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media-type parameters (e.g. `; charset=utf-8`) are irrelevant to routing.
fn normalize_hint(content_type: &str) -> String {
    let essence = content_type.split(';').next().unwrap_or("");
    essence.trim().to_ascii_lowercase()
}

fn extension_of(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

/// Detect the file kind from the file name and an optional content-type hint.
///
/// Checks are ordered, first match wins:
/// 1. Hint with an `image/` prefix selects [`FileKind::Image`].
/// 2. The PDF media type or a `.pdf` extension selects [`FileKind::Pdf`].
/// 3. The WordprocessingML media type or a `.docx` extension selects
///    [`FileKind::Docx`].
///
/// Anything else is rejected with [`TextliftError::UnsupportedFormat`].
/// Extension matching is case-insensitive.
pub fn detect_file_kind(file_name: &str, content_type: Option<&str>) -> Result<FileKind> {
    let hint = content_type.map(normalize_hint);
    let hint = hint.as_deref();
    let extension = extension_of(file_name);
    let extension = extension.as_deref();

    if let Some(hint) = hint
        && hint.starts_with("image/")
    {
        return Ok(FileKind::Image);
    }

    if hint == Some(PDF_MIME_TYPE) || extension == Some("pdf") {
        return Ok(FileKind::Pdf);
    }

    if hint == Some(DOCX_MIME_TYPE) || extension == Some("docx") {
        return Ok(FileKind::Docx);
    }

    Err(TextliftError::unsupported_format(format!(
        "'{}' is not a PDF, DOCX, or image{}",
        file_name,
        hint.map(|h| format!(" (content type '{h}')")).unwrap_or_default(),
    )))
}
