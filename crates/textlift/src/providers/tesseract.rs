//! OCR via the `tesseract` binary.
//!
//! Images are staged as PNG files in the system temp directory and handed to
//! tesseract in stdout mode, so no OCR library needs to be linked at build
//! time. Staged files are removed by an RAII guard on every path.

use crate::core::config::OcrOptions;
use crate::providers::OcrEngine;
use crate::{Result, TextliftError};
use async_trait::async_trait;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageEncoder};
use std::path::PathBuf;
use tokio::fs;
use tokio::process::Command;
use tokio::time::{Duration, timeout};

/// Default timeout for tesseract operations (120 seconds)
const TESSERACT_TIMEOUT_SECONDS: u64 = 120;

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

/// [`OcrEngine`] backed by a `tesseract` subprocess.
#[derive(Debug, Default, Clone, Copy)]
pub struct TesseractOcr;

impl TesseractOcr {
    fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        let mut buffer = Vec::new();
        let encoder = PngEncoder::new(&mut buffer);
        encoder
            .write_image(&rgb, width, height, image::ColorType::Rgb8.into())
            .map_err(|e| TextliftError::image_processing_with_source("Failed to encode page as PNG", e))?;
        Ok(buffer)
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, image: &DynamicImage, options: &OcrOptions) -> Result<String> {
        let png = Self::encode_png(image)?;

        let staged_path = std::env::temp_dir().join(format!("textlift_ocr_{}.png", uuid::Uuid::new_v4()));

        // RAII guard ensures cleanup on all paths including panic ~keep
        let _staged_guard = TempFile::new(staged_path.clone());

        fs::write(&staged_path, &png).await?;

        let child = Command::new("tesseract")
            .arg(&staged_path)
            .arg("stdout")
            .arg("-l")
            .arg(&options.language)
            .arg("--psm")
            .arg(options.psm.to_string())
            .arg("--oem")
            .arg(options.oem.to_string())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| -> TextliftError {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TextliftError::MissingDependency("tesseract binary not found on PATH".to_string())
                } else {
                    std::io::Error::other(format!("Failed to execute tesseract: {}", e)).into()
                }
            })?;

        let output = match timeout(Duration::from_secs(TESSERACT_TIMEOUT_SECONDS), child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(std::io::Error::other(format!("Failed to wait for tesseract: {}", e)).into()),
            Err(_) => {
                // Timeout - child was already consumed by wait_with_output(), process will be killed on drop ~keep
                return Err(TextliftError::ocr(format!(
                    "Tesseract recognition timed out after {} seconds",
                    TESSERACT_TIMEOUT_SECONDS
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TextliftError::ocr(format!("Tesseract failed: {}", stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
