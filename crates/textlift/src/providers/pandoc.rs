//! Structural DOCX parsing via the `pandoc` binary.
//!
//! The robust fallback for DOCX files whose direct text walk comes up short.
//! Pandoc converts the document to markdown and writes it, together with any
//! extracted media, into the caller's work directory.

use crate::providers::DocxStructuredParser;
use crate::{Result, TextliftError};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tokio::time::{Duration, timeout};

/// Default timeout for pandoc operations (120 seconds)
const PANDOC_TIMEOUT_SECONDS: u64 = 120;

/// File name pandoc is asked to write the markdown rendition to.
pub const DOCUMENT_MARKDOWN: &str = "document.md";

/// [`DocxStructuredParser`] backed by a `pandoc` subprocess.
#[derive(Debug, Default, Clone, Copy)]
pub struct PandocStructuredParser;

#[async_trait]
impl DocxStructuredParser for PandocStructuredParser {
    async fn parse_to_dir(&self, path: &Path, work_dir: &Path) -> Result<()> {
        let output_path = work_dir.join(DOCUMENT_MARKDOWN);

        let child = Command::new("pandoc")
            .arg(path)
            .arg("--from=docx")
            .arg("--to=markdown")
            .arg("--standalone")
            .arg("--wrap=preserve")
            .arg("--quiet")
            .arg("--output")
            .arg(&output_path)
            .arg("--extract-media")
            .arg(work_dir)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TextliftError::MissingDependency("pandoc binary not found on PATH".to_string())
                } else {
                    std::io::Error::other(format!("Failed to execute pandoc: {}", e)).into()
                }
            })?;

        let output = match timeout(Duration::from_secs(PANDOC_TIMEOUT_SECONDS), child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(std::io::Error::other(format!("Failed to wait for pandoc: {}", e)).into()),
            Err(_) => {
                // Timeout - child was already consumed by wait_with_output(), process will be killed on drop ~keep
                return Err(TextliftError::parsing(format!(
                    "Pandoc conversion timed out after {} seconds",
                    PANDOC_TIMEOUT_SECONDS
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);

            // Subprocess error analysis - wrap only if format/parsing error detected ~keep
            let stderr_lower = stderr.to_lowercase();
            if stderr_lower.contains("format")
                || stderr_lower.contains("unsupported")
                || stderr_lower.contains("error:")
                || stderr_lower.contains("failed")
            {
                return Err(TextliftError::parsing(format!(
                    "Pandoc format/parsing error: {}",
                    stderr
                )));
            }

            // True system error - bubble up as IO error ~keep
            return Err(std::io::Error::other(format!("Pandoc system error: {}", stderr)).into());
        }

        tracing::debug!(output = %output_path.display(), "pandoc conversion finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn pandoc_available() -> bool {
        Command::new("pandoc")
            .arg("--version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn test_missing_input_is_an_error() {
        if !pandoc_available().await {
            return;
        }

        let dir = tempdir().unwrap();
        let parser = PandocStructuredParser;
        let result = parser.parse_to_dir(Path::new("/nonexistent/input.docx"), dir.path()).await;
        assert!(result.is_err());
    }
}
