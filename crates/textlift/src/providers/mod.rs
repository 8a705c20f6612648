//! Capability providers backing the extraction tiers.
//!
//! Each tier of the pipeline talks to a backend through a small async trait.
//! The default implementations shell out to or link against real engines
//! (pdfium, tesseract, pandoc, ZIP+XML); tests substitute in-memory fakes.

pub mod docx;
pub mod pandoc;
pub mod pdfium;
pub mod tesseract;

use crate::Result;
use crate::core::config::OcrOptions;
use async_trait::async_trait;
use image::DynamicImage;
use std::path::Path;

/// Page-wise read of a PDF's embedded text layer.
#[async_trait]
pub trait PdfTextReader: Send + Sync {
    /// Returns one string per page, in page order.
    async fn read_page_text(&self, path: &Path) -> Result<Vec<String>>;
}

/// Rasterization of leading PDF pages for OCR.
#[async_trait]
pub trait PdfPageRenderer: Send + Sync {
    /// Renders at most `max_pages` leading pages at the given resolution.
    async fn render_pages(&self, path: &Path, max_pages: usize, dpi: u32) -> Result<Vec<DynamicImage>>;
}

/// Optical character recognition over a single image.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image: &DynamicImage, options: &OcrOptions) -> Result<String>;
}

/// Direct paragraph/table text walk over a DOCX file.
#[async_trait]
pub trait DocxTextReader: Send + Sync {
    async fn read_text(&self, path: &Path) -> Result<String>;
}

/// Structural DOCX parse that renders markdown files into a directory.
///
/// The parser writes `document.md` (plus any sidecar files) under `work_dir`;
/// the caller reads the results back. The directory exists before the call.
#[async_trait]
pub trait DocxStructuredParser: Send + Sync {
    async fn parse_to_dir(&self, path: &Path, work_dir: &Path) -> Result<()>;
}

pub use docx::ZipDocxReader;
pub use pandoc::PandocStructuredParser;
pub use pdfium::{PdfiumRenderer, PdfiumTextReader};
pub use tesseract::TesseractOcr;
