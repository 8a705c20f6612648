//! The extraction strategy selector.
//!
//! One entry point, [`Extractor::extract_file`], drives the whole pipeline:
//! classify the input, run the kind's cheap direct tier, measure how much
//! readable text it produced, and fall back to the expensive tier (OCR for
//! PDFs, the structural parser for DOCX) only when the direct result is too
//! short. There are no retries; the fallback tiers are the only resilience.
//!
//! All backends are trait objects, so tests can substitute fakes and assert
//! which tiers ran.

use crate::core::config::ExtractionConfig;
use crate::core::kind::{FileKind, detect_file_kind};
use crate::core::workarea::WorkArea;
use crate::providers::{
    DocxStructuredParser, DocxTextReader, OcrEngine, PandocStructuredParser, PdfPageRenderer, PdfTextReader,
    PdfiumRenderer, PdfiumTextReader, TesseractOcr, ZipDocxReader, pandoc::DOCUMENT_MARKDOWN,
};
use crate::text::normalize::normalize_extracted_text;
use crate::{Result, TextliftError};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Normalized plain text.
    pub text: String,
    /// The kind the input was classified as.
    pub kind: FileKind,
}

/// The extraction pipeline.
pub struct Extractor {
    config: ExtractionConfig,
    pdf_text: Arc<dyn PdfTextReader>,
    pdf_renderer: Arc<dyn PdfPageRenderer>,
    ocr: Arc<dyn OcrEngine>,
    docx_text: Arc<dyn DocxTextReader>,
    docx_structured: Arc<dyn DocxStructuredParser>,
}

impl Extractor {
    /// Build an extractor wired to the default backends (pdfium, tesseract,
    /// ZIP+XML, pandoc).
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            config,
            pdf_text: Arc::new(PdfiumTextReader),
            pdf_renderer: Arc::new(PdfiumRenderer),
            ocr: Arc::new(TesseractOcr),
            docx_text: Arc::new(ZipDocxReader),
            docx_structured: Arc::new(PandocStructuredParser),
        }
    }

    /// Build an extractor with explicit backends.
    pub fn with_providers(
        config: ExtractionConfig,
        pdf_text: Arc<dyn PdfTextReader>,
        pdf_renderer: Arc<dyn PdfPageRenderer>,
        ocr: Arc<dyn OcrEngine>,
        docx_text: Arc<dyn DocxTextReader>,
        docx_structured: Arc<dyn DocxStructuredParser>,
    ) -> Self {
        Self {
            config,
            pdf_text,
            pdf_renderer,
            ocr,
            docx_text,
            docx_structured,
        }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract plain text from the file at `path`.
    ///
    /// `file_name` is the original (client-facing) name used for
    /// classification and work-area naming; `content_type` is an optional
    /// media-type hint that takes precedence over the extension.
    ///
    /// The request's work area is removed before this returns, success or
    /// failure. Returns [`TextliftError::NoReadableText`] when every tier for
    /// the detected kind produced only whitespace.
    pub async fn extract_file(&self, path: &Path, file_name: &str, content_type: Option<&str>) -> Result<Extraction> {
        let kind = detect_file_kind(file_name, content_type)?;
        tracing::debug!(file = file_name, kind = %kind, "starting extraction");

        let work = WorkArea::plan(self.config.work_root.as_deref(), file_name);

        let result = match kind {
            FileKind::Pdf => self.extract_pdf(path).await,
            FileKind::Docx => self.extract_docx(path, &work).await,
            FileKind::Image => self.extract_image(path).await,
        };

        // Cleanup always runs and never masks the extraction outcome.
        work.cleanup().await;

        let text = result?;
        if text.trim().is_empty() {
            return Err(TextliftError::NoReadableText);
        }

        Ok(Extraction { text, kind })
    }

    async fn extract_pdf(&self, path: &Path) -> Result<String> {
        let pages = self.pdf_text.read_page_text(path).await?;
        let direct = normalize_extracted_text(&pages.join("\n\n"));
        let direct_chars = direct.chars().count();

        if direct_chars >= self.config.pdf_direct_min_chars {
            return Ok(direct);
        }

        tracing::debug!(
            chars = direct_chars,
            threshold = self.config.pdf_direct_min_chars,
            "PDF text layer too short, falling back to OCR"
        );

        let images = self
            .pdf_renderer
            .render_pages(path, self.config.ocr_max_pages, self.config.ocr_dpi)
            .await?;

        let mut page_texts = Vec::with_capacity(images.len());
        for image in &images {
            page_texts.push(self.ocr.recognize(image, &self.config.ocr).await?);
        }

        let recognized = normalize_extracted_text(&page_texts.join("\n\n"));

        // A tie keeps the direct text; OCR must strictly win to replace it.
        if recognized.chars().count() > direct_chars {
            Ok(recognized)
        } else {
            Ok(direct)
        }
    }

    async fn extract_docx(&self, path: &Path, work: &WorkArea) -> Result<String> {
        let direct = normalize_extracted_text(&self.docx_text.read_text(path).await?);
        let direct_chars = direct.chars().count();

        if direct_chars >= self.config.docx_direct_min_chars {
            return Ok(direct);
        }

        tracing::debug!(
            chars = direct_chars,
            threshold = self.config.docx_direct_min_chars,
            "DOCX walk too short, falling back to structural parse"
        );

        work.ensure_dir().await?;
        self.docx_structured.parse_to_dir(path, work.path()).await?;

        read_markdown_output(work.path()).await
    }

    async fn extract_image(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        let decoded = image::load_from_memory(&bytes)?;
        // OCR engines expect plain 3-channel input; flatten alpha/grayscale.
        let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());

        let text = self.ocr.recognize(&rgb, &self.config.ocr).await?;
        Ok(normalize_extracted_text(&text))
    }
}

/// Read the structural parser's markdown output out of the work area.
///
/// Prefers the conventional `document.md`; when absent, falls back to the
/// lexically-first `.md` file (searched recursively) whose normalized text is
/// non-empty. Returns an empty string when no markdown carries text.
async fn read_markdown_output(work_dir: &Path) -> Result<String> {
    let expected = work_dir.join(DOCUMENT_MARKDOWN);
    if expected.is_file() {
        let content = tokio::fs::read_to_string(&expected).await?;
        return Ok(normalize_extracted_text(&content));
    }

    for path in collect_markdown_files(work_dir).await? {
        let content = tokio::fs::read_to_string(&path).await?;
        let normalized = normalize_extracted_text(&content);
        if !normalized.is_empty() {
            return Ok(normalized);
        }
    }

    Ok(String::new())
}

/// All `.md` files under `root`, sorted lexically by full path.
async fn collect_markdown_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().and_then(|e| e.to_str()) == Some("md") {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}
