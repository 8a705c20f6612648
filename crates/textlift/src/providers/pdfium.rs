//! PDF text reading and page rendering via pdfium.
//!
//! Both providers bind to the system pdfium library at runtime, so the crate
//! builds without pdfium present; extraction fails with a missing-dependency
//! error instead.

use crate::providers::{PdfPageRenderer, PdfTextReader};
use crate::{Result, TextliftError};
use async_trait::async_trait;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;

const PDF_POINTS_PER_INCH: f32 = 72.0;

fn bind() -> Result<Pdfium> {
    // Prefer a library dropped next to the binary, fall back to the system one.
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| TextliftError::MissingDependency(format!("pdfium library not available: {}", e)))?;
    Ok(Pdfium::new(bindings))
}

fn load_document<'a>(pdfium: &'a Pdfium, path: &Path) -> Result<PdfDocument<'a>> {
    pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| TextliftError::parsing_with_source(format!("Failed to load PDF {}", path.display()), e))
}

/// [`PdfTextReader`] over the PDF's embedded text layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfiumTextReader;

#[async_trait]
impl PdfTextReader for PdfiumTextReader {
    async fn read_page_text(&self, path: &Path) -> Result<Vec<String>> {
        let pdfium = bind()?;
        let document = load_document(&pdfium, path)?;

        let mut pages = Vec::with_capacity(document.pages().len() as usize);
        for page in document.pages().iter() {
            let text = page
                .text()
                .map_err(|e| TextliftError::parsing_with_source("Page text extraction failed", e))?;
            pages.push(text.all());
            // Page resources are automatically released as we iterate
        }

        Ok(pages)
    }
}

/// [`PdfPageRenderer`] rasterizing leading pages for OCR.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfiumRenderer;

#[async_trait]
impl PdfPageRenderer for PdfiumRenderer {
    async fn render_pages(&self, path: &Path, max_pages: usize, dpi: u32) -> Result<Vec<DynamicImage>> {
        let pdfium = bind()?;
        let document = load_document(&pdfium, path)?;

        let scale = dpi as f32 / PDF_POINTS_PER_INCH;
        let page_count = (document.pages().len() as usize).min(max_pages);
        let mut images = Vec::with_capacity(page_count);

        for page in document.pages().iter().take(max_pages) {
            let width_points = page.width().value;
            let height_points = page.height().value;

            let config = PdfRenderConfig::new()
                .set_target_width(((width_points * scale) as i32).max(1))
                .set_target_height(((height_points * scale) as i32).max(1))
                .rotate_if_landscape(PdfPageRenderRotation::None, false);

            let bitmap = page
                .render_with_config(&config)
                .map_err(|e| TextliftError::parsing_with_source("Failed to render page", e))?;

            images.push(DynamicImage::ImageRgb8(bitmap.as_image().into_rgb8()));
        }

        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdfium_available() -> bool {
        bind().is_ok()
    }

    #[tokio::test]
    async fn test_read_invalid_pdf_is_parsing_error() {
        if !pdfium_available() {
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();

        let result = PdfiumTextReader.read_page_text(&path).await;
        assert!(matches!(result, Err(TextliftError::Parsing { .. })));
    }

    #[tokio::test]
    async fn test_render_missing_file_is_parsing_error() {
        if !pdfium_available() {
            return;
        }

        let result = PdfiumRenderer
            .render_pages(Path::new("/nonexistent/input.pdf"), 12, 220)
            .await;
        assert!(result.is_err());
    }
}
