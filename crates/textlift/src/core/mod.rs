//! Core extraction orchestration module.
//!
//! This module contains the file-kind classifier, the configuration layer,
//! the request-scoped work area, and the strategy selector that drives the
//! per-kind extraction tiers.
//!
//! # Example
//!
//! ```rust,no_run
//! use textlift::core::config::ExtractionConfig;
//! use textlift::core::extractor::Extractor;
//!
//! # async fn example() -> textlift::Result<()> {
//! let extractor = Extractor::new(ExtractionConfig::default());
//! let result = extractor.extract_file("report.docx".as_ref(), "report.docx", None).await?;
//! println!("{}", result.text);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod extractor;
pub mod kind;
pub mod workarea;

pub use config::{ExtractionConfig, OcrOptions};
pub use extractor::{Extraction, Extractor};
pub use kind::{FileKind, detect_file_kind};
pub use workarea::WorkArea;
