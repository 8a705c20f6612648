//! End-to-end pipeline tests with fake backends.
//!
//! The real engines (pdfium, tesseract, pandoc) are substituted with scripted
//! fakes so the tier-selection logic is observable: each fake counts its
//! invocations and the tests assert which tiers ran.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use image::DynamicImage;
use tempfile::tempdir;
use textlift::providers::{DocxStructuredParser, DocxTextReader, OcrEngine, PdfPageRenderer, PdfTextReader};
use textlift::{ExtractionConfig, Extractor, FileKind, OcrOptions, Result, TextliftError};

struct ScriptedPdfText {
    pages: Vec<String>,
    calls: AtomicUsize,
}

impl ScriptedPdfText {
    fn new(pages: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PdfTextReader for ScriptedPdfText {
    async fn read_page_text(&self, _path: &Path) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pages.clone())
    }
}

struct ScriptedRenderer {
    page_count: usize,
    calls: AtomicUsize,
}

impl ScriptedRenderer {
    fn new(page_count: usize) -> Arc<Self> {
        Arc::new(Self {
            page_count,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PdfPageRenderer for ScriptedRenderer {
    async fn render_pages(&self, _path: &Path, max_pages: usize, _dpi: u32) -> Result<Vec<DynamicImage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let count = self.page_count.min(max_pages);
        Ok((0..count).map(|_| DynamicImage::new_rgb8(4, 4)).collect())
    }
}

struct ScriptedOcr {
    text: String,
    calls: AtomicUsize,
}

impl ScriptedOcr {
    fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl OcrEngine for ScriptedOcr {
    async fn recognize(&self, _image: &DynamicImage, _options: &OcrOptions) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}

struct ScriptedDocxText {
    text: String,
    calls: AtomicUsize,
}

impl ScriptedDocxText {
    fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl DocxTextReader for ScriptedDocxText {
    async fn read_text(&self, _path: &Path) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}

/// Structural parser fake that writes scripted files into the work area.
struct ScriptedStructuredParser {
    files: Vec<(PathBuf, String)>,
    fail: bool,
    calls: AtomicUsize,
}

impl ScriptedStructuredParser {
    fn new(files: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            files: files
                .iter()
                .map(|(name, content)| (PathBuf::from(name), content.to_string()))
                .collect(),
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            files: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl DocxStructuredParser for ScriptedStructuredParser {
    async fn parse_to_dir(&self, _path: &Path, work_dir: &Path) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TextliftError::parsing("scripted structural failure"));
        }
        for (name, content) in &self.files {
            let target = work_dir.join(name);
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&target, content).await?;
        }
        Ok(())
    }
}

struct Fixture {
    pdf_text: Arc<ScriptedPdfText>,
    renderer: Arc<ScriptedRenderer>,
    ocr: Arc<ScriptedOcr>,
    docx_text: Arc<ScriptedDocxText>,
    structured: Arc<ScriptedStructuredParser>,
    extractor: Extractor,
}

fn fixture(
    config: ExtractionConfig,
    pdf_text: Arc<ScriptedPdfText>,
    renderer: Arc<ScriptedRenderer>,
    ocr: Arc<ScriptedOcr>,
    docx_text: Arc<ScriptedDocxText>,
    structured: Arc<ScriptedStructuredParser>,
) -> Fixture {
    let extractor = Extractor::with_providers(
        config,
        pdf_text.clone(),
        renderer.clone(),
        ocr.clone(),
        docx_text.clone(),
        structured.clone(),
    );
    Fixture {
        pdf_text,
        renderer,
        ocr,
        docx_text,
        structured,
        extractor,
    }
}

/// A config with small thresholds and a scoped work root, so tests can use
/// short strings and inspect work-area cleanup.
fn test_config(work_root: &Path) -> ExtractionConfig {
    ExtractionConfig {
        pdf_direct_min_chars: 20,
        docx_direct_min_chars: 20,
        work_root: Some(work_root.to_path_buf()),
        ..ExtractionConfig::default()
    }
}

fn long_text() -> String {
    "The quick brown fox jumps over the lazy dog. ".repeat(4)
}

#[tokio::test]
async fn pdf_with_rich_text_layer_never_invokes_ocr() {
    let work = tempdir().unwrap();
    let text = long_text();
    let f = fixture(
        test_config(work.path()),
        ScriptedPdfText::new(&[&text]),
        ScriptedRenderer::new(3),
        ScriptedOcr::new("should not be used"),
        ScriptedDocxText::new(""),
        ScriptedStructuredParser::new(&[]),
    );

    let result = f
        .extractor
        .extract_file(Path::new("/nonexistent/report.pdf"), "report.pdf", None)
        .await
        .unwrap();

    assert_eq!(result.kind, FileKind::Pdf);
    assert!(result.text.contains("quick brown fox"));
    assert_eq!(f.pdf_text.calls.load(Ordering::SeqCst), 1);
    assert_eq!(f.renderer.calls.load(Ordering::SeqCst), 0);
    assert_eq!(f.ocr.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn pdf_with_short_text_layer_falls_back_to_ocr() {
    let work = tempdir().unwrap();
    let ocr_text = long_text();
    let f = fixture(
        test_config(work.path()),
        ScriptedPdfText::new(&["stub"]),
        ScriptedRenderer::new(2),
        ScriptedOcr::new(&ocr_text),
        ScriptedDocxText::new(""),
        ScriptedStructuredParser::new(&[]),
    );

    let result = f
        .extractor
        .extract_file(Path::new("/nonexistent/scan.pdf"), "scan.pdf", None)
        .await
        .unwrap();

    assert!(result.text.contains("quick brown fox"));
    assert_eq!(f.renderer.calls.load(Ordering::SeqCst), 1);
    // One OCR call per rendered page.
    assert_eq!(f.ocr.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn pdf_tie_keeps_direct_text() {
    let work = tempdir().unwrap();
    // Direct and OCR both normalize to four characters; direct must win.
    let f = fixture(
        test_config(work.path()),
        ScriptedPdfText::new(&["abcd"]),
        ScriptedRenderer::new(1),
        ScriptedOcr::new("wxyz"),
        ScriptedDocxText::new(""),
        ScriptedStructuredParser::new(&[]),
    );

    let result = f
        .extractor
        .extract_file(Path::new("/nonexistent/tie.pdf"), "tie.pdf", None)
        .await
        .unwrap();

    assert_eq!(result.text, "abcd");
}

#[tokio::test]
async fn pdf_ocr_shorter_than_direct_keeps_direct() {
    let work = tempdir().unwrap();
    let f = fixture(
        test_config(work.path()),
        ScriptedPdfText::new(&["direct tier text"]),
        ScriptedRenderer::new(1),
        ScriptedOcr::new("ocr"),
        ScriptedDocxText::new(""),
        ScriptedStructuredParser::new(&[]),
    );

    let result = f
        .extractor
        .extract_file(Path::new("/nonexistent/mixed.pdf"), "mixed.pdf", None)
        .await
        .unwrap();

    assert_eq!(result.text, "direct tier text");
}

#[tokio::test]
async fn pdf_renderer_honors_page_cap() {
    let work = tempdir().unwrap();
    let config = ExtractionConfig {
        ocr_max_pages: 3,
        ..test_config(work.path())
    };
    let f = fixture(
        config,
        ScriptedPdfText::new(&["x"]),
        ScriptedRenderer::new(10),
        ScriptedOcr::new("recognized page body text"),
        ScriptedDocxText::new(""),
        ScriptedStructuredParser::new(&[]),
    );

    f.extractor
        .extract_file(Path::new("/nonexistent/big.pdf"), "big.pdf", None)
        .await
        .unwrap();

    // The fake clamps to max_pages, so OCR runs once per capped page.
    assert_eq!(f.ocr.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn docx_with_enough_direct_text_skips_structural_parse() {
    let work = tempdir().unwrap();
    let text = long_text();
    let f = fixture(
        test_config(work.path()),
        ScriptedPdfText::new(&[]),
        ScriptedRenderer::new(0),
        ScriptedOcr::new(""),
        ScriptedDocxText::new(&text),
        ScriptedStructuredParser::new(&[("document.md", "should not be read")]),
    );

    let result = f
        .extractor
        .extract_file(Path::new("/nonexistent/memo.docx"), "memo.docx", None)
        .await
        .unwrap();

    assert_eq!(result.kind, FileKind::Docx);
    assert!(result.text.contains("quick brown fox"));
    assert_eq!(f.structured.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn docx_fallback_reads_document_md_from_work_area() {
    let work = tempdir().unwrap();
    let f = fixture(
        test_config(work.path()),
        ScriptedPdfText::new(&[]),
        ScriptedRenderer::new(0),
        ScriptedOcr::new(""),
        ScriptedDocxText::new("stub"),
        ScriptedStructuredParser::new(&[("document.md", "# Quarterly Report\n\nRevenue was **flat**.")]),
    );

    let result = f
        .extractor
        .extract_file(Path::new("/nonexistent/q3.docx"), "q3.docx", None)
        .await
        .unwrap();

    assert_eq!(f.docx_text.calls.load(Ordering::SeqCst), 1);
    assert_eq!(f.structured.calls.load(Ordering::SeqCst), 1);
    assert_eq!(result.text, "Quarterly Report\n\nRevenue was flat.");
}

#[tokio::test]
async fn docx_fallback_takes_lexically_first_nonempty_markdown() {
    let work = tempdir().unwrap();
    let f = fixture(
        test_config(work.path()),
        ScriptedPdfText::new(&[]),
        ScriptedRenderer::new(0),
        ScriptedOcr::new(""),
        ScriptedDocxText::new("stub"),
        // No document.md; a.md is blank, so b.md is the answer.
        ScriptedStructuredParser::new(&[("a.md", "  \n"), ("b.md", "fallback body"), ("c.md", "later")]),
    );

    let result = f
        .extractor
        .extract_file(Path::new("/nonexistent/odd.docx"), "odd.docx", None)
        .await
        .unwrap();

    assert_eq!(result.text, "fallback body");
}

#[tokio::test]
async fn docx_structural_failure_surfaces_and_work_area_is_removed() {
    let work = tempdir().unwrap();
    let f = fixture(
        test_config(work.path()),
        ScriptedPdfText::new(&[]),
        ScriptedRenderer::new(0),
        ScriptedOcr::new(""),
        ScriptedDocxText::new("stub"),
        ScriptedStructuredParser::failing(),
    );

    let err = f
        .extractor
        .extract_file(Path::new("/nonexistent/bad.docx"), "bad.docx", None)
        .await
        .unwrap_err();

    assert!(matches!(err, TextliftError::Parsing { .. }));

    // The per-request directory was created for the fallback and must be gone.
    let mut entries = std::fs::read_dir(work.path()).unwrap();
    assert!(entries.next().is_none());
}

#[tokio::test]
async fn docx_fallback_with_empty_output_is_no_readable_text() {
    let work = tempdir().unwrap();
    let f = fixture(
        test_config(work.path()),
        ScriptedPdfText::new(&[]),
        ScriptedRenderer::new(0),
        ScriptedOcr::new(""),
        ScriptedDocxText::new("   "),
        ScriptedStructuredParser::new(&[("document.md", "\n\n   \n")]),
    );

    let err = f
        .extractor
        .extract_file(Path::new("/nonexistent/empty.docx"), "empty.docx", None)
        .await
        .unwrap_err();

    assert!(matches!(err, TextliftError::NoReadableText));
}

#[tokio::test]
async fn whitespace_only_pdf_is_no_readable_text() {
    let work = tempdir().unwrap();
    let f = fixture(
        test_config(work.path()),
        ScriptedPdfText::new(&["   ", "\n\n"]),
        ScriptedRenderer::new(1),
        ScriptedOcr::new("  \n "),
        ScriptedDocxText::new(""),
        ScriptedStructuredParser::new(&[]),
    );

    let err = f
        .extractor
        .extract_file(Path::new("/nonexistent/blank.pdf"), "blank.pdf", None)
        .await
        .unwrap_err();

    assert!(matches!(err, TextliftError::NoReadableText));
}

#[tokio::test]
async fn image_extraction_runs_ocr_once() {
    let work = tempdir().unwrap();
    let input = tempdir().unwrap();
    let png_path = input.path().join("page.png");
    DynamicImage::new_rgb8(8, 8).save(&png_path).unwrap();

    let f = fixture(
        test_config(work.path()),
        ScriptedPdfText::new(&[]),
        ScriptedRenderer::new(0),
        ScriptedOcr::new("Scanned **note** text"),
        ScriptedDocxText::new(""),
        ScriptedStructuredParser::new(&[]),
    );

    let result = f
        .extractor
        .extract_file(&png_path, "page.png", Some("image/png"))
        .await
        .unwrap();

    assert_eq!(result.kind, FileKind::Image);
    assert_eq!(result.text, "Scanned note text");
    assert_eq!(f.ocr.calls.load(Ordering::SeqCst), 1);
    assert_eq!(f.pdf_text.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unsupported_extension_is_rejected_before_any_backend_runs() {
    let work = tempdir().unwrap();
    let f = fixture(
        test_config(work.path()),
        ScriptedPdfText::new(&["text"]),
        ScriptedRenderer::new(0),
        ScriptedOcr::new(""),
        ScriptedDocxText::new(""),
        ScriptedStructuredParser::new(&[]),
    );

    let err = f
        .extractor
        .extract_file(Path::new("/nonexistent/notes.txt"), "notes.txt", None)
        .await
        .unwrap_err();

    assert!(matches!(err, TextliftError::UnsupportedFormat(_)));
    assert_eq!(f.pdf_text.calls.load(Ordering::SeqCst), 0);
    assert_eq!(f.docx_text.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn content_type_hint_overrides_extension() {
    let work = tempdir().unwrap();
    let text = long_text();
    let f = fixture(
        test_config(work.path()),
        ScriptedPdfText::new(&[&text]),
        ScriptedRenderer::new(0),
        ScriptedOcr::new(""),
        ScriptedDocxText::new(""),
        ScriptedStructuredParser::new(&[]),
    );

    // Extension says DOCX, the hint says PDF; the hint wins.
    let result = f
        .extractor
        .extract_file(
            Path::new("/nonexistent/mislabeled.docx"),
            "mislabeled.docx",
            Some("application/pdf"),
        )
        .await
        .unwrap();

    assert_eq!(result.kind, FileKind::Pdf);
    assert_eq!(f.pdf_text.calls.load(Ordering::SeqCst), 1);
    assert_eq!(f.docx_text.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn concurrent_same_name_requests_do_not_collide() {
    let work = tempdir().unwrap();
    let f1 = fixture(
        test_config(work.path()),
        ScriptedPdfText::new(&[]),
        ScriptedRenderer::new(0),
        ScriptedOcr::new(""),
        ScriptedDocxText::new("stub"),
        ScriptedStructuredParser::new(&[("document.md", "first body")]),
    );
    let f2 = fixture(
        test_config(work.path()),
        ScriptedPdfText::new(&[]),
        ScriptedRenderer::new(0),
        ScriptedOcr::new(""),
        ScriptedDocxText::new("stub"),
        ScriptedStructuredParser::new(&[("document.md", "second body")]),
    );

    let (a, b) = tokio::join!(
        f1.extractor
            .extract_file(Path::new("/nonexistent/same.docx"), "same.docx", None),
        f2.extractor
            .extract_file(Path::new("/nonexistent/same.docx"), "same.docx", None),
    );

    assert_eq!(a.unwrap().text, "first body");
    assert_eq!(b.unwrap().text, "second body");
}

#[tokio::test]
async fn normalization_applies_to_pdf_direct_text() {
    let work = tempdir().unwrap();
    let markdown = format!("# Heading\n\nSome **bold** body. {}", long_text());
    let f = fixture(
        test_config(work.path()),
        ScriptedPdfText::new(&[&markdown]),
        ScriptedRenderer::new(0),
        ScriptedOcr::new(""),
        ScriptedDocxText::new(""),
        ScriptedStructuredParser::new(&[]),
    );

    let result = f
        .extractor
        .extract_file(Path::new("/nonexistent/styled.pdf"), "styled.pdf", None)
        .await
        .unwrap();

    assert!(result.text.starts_with("Heading\n\nSome bold body."));
    assert!(!result.text.contains('#'));
    assert!(!result.text.contains("**"));
}
