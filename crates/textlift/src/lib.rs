//! textlift - Plain-Text Document Extraction
//!
//! textlift pulls plain text out of PDFs, DOCX files, and images. Each format
//! has a cheap "direct" extraction tier and a heavier fallback tier (OCR for
//! PDFs, a structural markdown parse for DOCX); the pipeline picks between
//! them based on how much readable text the direct tier produced. Extractor
//! output is run through a markdown-stripping normalizer so callers always
//! receive clean prose.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use textlift::{ExtractionConfig, Extractor};
//!
//! #[tokio::main]
//! async fn main() -> textlift::Result<()> {
//!     let extractor = Extractor::new(ExtractionConfig::default());
//!     let result = extractor.extract_file("scan.pdf".as_ref(), "scan.pdf", None).await?;
//!     println!("{} ({} chars)", result.text, result.text.chars().count());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **Core Module** (`core`): File-kind detection, config loading, the
//!   strategy selector, and the request-scoped work area
//! - **Providers** (`providers`): Capability traits with default backends
//!   (pdfium for PDF text and rendering, tesseract for OCR, ZIP+XML and
//!   pandoc for DOCX)
//! - **Text** (`text`): The markdown-stripping normalizer

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod providers;
pub mod text;

#[cfg(feature = "api")]
pub mod api;

pub use error::{Result, TextliftError};

pub use core::config::{ExtractionConfig, OcrOptions};
pub use core::extractor::{Extraction, Extractor};
pub use core::kind::{DOCX_MIME_TYPE, FileKind, PDF_MIME_TYPE, detect_file_kind};
pub use core::workarea::WorkArea;

pub use text::normalize::normalize_extracted_text;
