//! Configuration loading and management.
//!
//! The pipeline's quality thresholds, OCR tuning, and work-area root are all
//! configuration rather than constants. Configuration can be created
//! programmatically, loaded from a TOML file, or discovered as
//! `textlift.toml` in the current directory or any parent.

use crate::{Result, TextliftError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main extraction configuration.
///
/// # Example
///
/// ```rust
/// use textlift::core::config::ExtractionConfig;
///
/// // Create with defaults
/// let config = ExtractionConfig::default();
///
/// // Load from TOML file
/// // let config = ExtractionConfig::from_toml_file("textlift.toml")?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum normalized character count for accepting the direct PDF text
    /// layer without falling back to OCR.
    pub pdf_direct_min_chars: usize,

    /// Minimum normalized character count for accepting the direct DOCX walk
    /// without falling back to the structural parser.
    pub docx_direct_min_chars: usize,

    /// Leading-page cap for the PDF OCR fallback.
    pub ocr_max_pages: usize,

    /// Render resolution for the PDF OCR fallback.
    pub ocr_dpi: u32,

    /// OCR engine tuning, shared by the PDF fallback and the image path.
    pub ocr: OcrOptions,

    /// Root directory for request-scoped work areas (None = system temp dir).
    pub work_root: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pdf_direct_min_chars: 250,
            docx_direct_min_chars: 120,
            ocr_max_pages: 12,
            ocr_dpi: 220,
            ocr: OcrOptions::default(),
            work_root: None,
        }
    }
}

/// OCR engine tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrOptions {
    /// Language code (e.g., "eng", "deu")
    pub language: String,

    /// Page segmentation mode. 4 (single column of variable-size text) suits
    /// rendered document pages.
    pub psm: u8,

    /// OCR engine mode. 3 lets the engine pick.
    pub oem: u8,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            psm: 4,
            oem: 3,
        }
    }
}

impl ExtractionConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            TextliftError::validation(format!("Failed to read config file {}: {}", path.as_ref().display(), e))
        })?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| TextliftError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Discover `textlift.toml` in the current directory or any parent.
    ///
    /// Returns `Ok(None)` when no config file exists anywhere up the tree.
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(TextliftError::Io)?;

        loop {
            let candidate = current.join("textlift.toml");
            if candidate.exists() {
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Range checks for the tunables.
    pub fn validate(&self) -> Result<()> {
        if self.ocr_max_pages == 0 {
            return Err(TextliftError::validation("ocr_max_pages must be at least 1"));
        }
        if self.ocr_dpi == 0 {
            return Err(TextliftError::validation("ocr_dpi must be at least 1"));
        }
        if self.ocr.language.is_empty() {
            return Err(TextliftError::validation("ocr.language must not be empty"));
        }
        if self.ocr.psm > 13 {
            return Err(TextliftError::validation(format!(
                "ocr.psm must be 0-13, got {}",
                self.ocr.psm
            )));
        }
        if self.ocr.oem > 3 {
            return Err(TextliftError::validation(format!(
                "ocr.oem must be 0-3, got {}",
                self.ocr.oem
            )));
        }
        Ok(())
    }
}
