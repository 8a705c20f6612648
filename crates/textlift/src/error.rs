//! Error types for textlift.
//!
//! All fallible operations in the library return [`Result`], built on
//! [`TextliftError`]:
//!
//! - Use `thiserror` for automatic `Error` trait implementation
//! - Preserve error chains with `#[source]` attributes
//! - Include context in error messages (file paths, binary names, etc.)
//!
//! # Error Handling Philosophy
//!
//! **System errors MUST always bubble up unchanged:**
//! - `TextliftError::Io` (from `std::io::Error`) - File system errors, permission errors
//! - These indicate real system problems that users need to know about
//!
//! **Application errors are wrapped with context:**
//! - `Parsing` - Document format errors, corrupt files
//! - `Ocr` - OCR processing failures
//! - `ImageProcessing` - Image decode/convert failures
//! - `Validation` - Invalid configuration or parameters
//! - `MissingDependency` - Missing external binaries or libraries
//!
//! Two variants are signals rather than failures of the machinery:
//! `UnsupportedFormat` means the caller handed us a file kind the pipeline
//! does not handle, and `NoReadableText` means every extraction tier ran but
//! produced only whitespace.
//!
//! # Example
//!
//! ```rust
//! use textlift::{Result, TextliftError};
//!
//! fn require_language(lang: &str) -> Result<()> {
//!     if lang.is_empty() {
//!         return Err(TextliftError::validation("OCR language must not be empty"));
//!     }
//!     Ok(())
//! }
//! ```
use thiserror::Error;

/// Result type alias using `TextliftError`.
pub type Result<T> = std::result::Result<T, TextliftError>;

/// Main error type for all textlift operations.
///
/// # Variants
///
/// - `Io` - File system and I/O errors (always bubble up)
/// - `UnsupportedFormat` - File kind outside PDF/DOCX/image
/// - `Parsing` - Document parsing errors (corrupt files, backend failures)
/// - `Ocr` - OCR processing errors
/// - `ImageProcessing` - Image decode/convert errors
/// - `Validation` - Input validation errors (invalid config, parameters)
/// - `MissingDependency` - Missing external binaries (tesseract, pandoc) or libraries
/// - `NoReadableText` - Every extraction tier yielded only whitespace
#[derive(Debug, Error)]
pub enum TextliftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("OCR error: {message}")]
    Ocr {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Image processing error: {message}")]
    ImageProcessing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("No readable text could be extracted from the document")]
    NoReadableText,
}

impl From<image::ImageError> for TextliftError {
    fn from(err: image::ImageError) -> Self {
        TextliftError::ImageProcessing {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $with_source:ident, $variant:ident) => {
        #[doc = concat!("Create a `", stringify!($variant), "` error")]
        pub fn $name<S: Into<String>>(message: S) -> Self {
            Self::$variant {
                message: message.into(),
                source: None,
            }
        }

        #[doc = concat!("Create a `", stringify!($variant), "` error with source")]
        pub fn $with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
            message: S,
            source: E,
        ) -> Self {
            Self::$variant {
                message: message.into(),
                source: Some(Box::new(source)),
            }
        }
    };
}

impl TextliftError {
    error_constructor!(parsing, parsing_with_source, Parsing);
    error_constructor!(ocr, ocr_with_source, Ocr);
    error_constructor!(image_processing, image_processing_with_source, ImageProcessing);
    error_constructor!(validation, validation_with_source, Validation);

    /// Create an `UnsupportedFormat` error.
    pub fn unsupported_format<S: Into<String>>(detail: S) -> Self {
        Self::UnsupportedFormat(detail.into())
    }
}
