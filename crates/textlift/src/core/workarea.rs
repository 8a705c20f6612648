//! Request-scoped scratch directory.
//!
//! The DOCX structural fallback stages its markdown output on disk. Each
//! extraction request gets its own directory named after the input's stem
//! plus a random key, so concurrent requests over the same file name never
//! collide. The directory is created lazily and removed best-effort before
//! the request returns; a `Drop` safety net covers early exits.

use crate::Result;
use std::path::{Path, PathBuf};

/// Scratch directory for a single extraction request.
#[derive(Debug)]
pub struct WorkArea {
    path: PathBuf,
    cleaned: bool,
}

impl WorkArea {
    /// Plan a work area under `work_root` (system temp dir when `None`) for
    /// an input named `file_name`. Nothing is created on disk yet.
    pub fn plan(work_root: Option<&Path>, file_name: &str) -> Self {
        let stem = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "input".to_string());

        let root = work_root.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir);
        let path = root.join(format!("{}-{}", stem, uuid::Uuid::new_v4().simple()));

        Self { path, cleaned: false }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory (and parents) if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.path).await?;
        Ok(())
    }

    /// Remove the directory and everything in it. Best-effort: a failure is
    /// logged and swallowed so it never masks the extraction outcome.
    pub async fn cleanup(mut self) {
        self.cleaned = true;
        match tokio::fs::remove_dir_all(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove work area");
            }
        }
    }
}

impl Drop for WorkArea {
    fn drop(&mut self) {
        if !self.cleaned && self.path.exists() {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_contains_stem() {
        let work = WorkArea::plan(None, "quarterly-report.docx");
        let name = work.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("quarterly-report-"));
    }

    #[test]
    fn test_same_stem_yields_distinct_paths() {
        let a = WorkArea::plan(None, "report.docx");
        let b = WorkArea::plan(None, "report.docx");
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_nameless_input_gets_placeholder_stem() {
        let work = WorkArea::plan(None, "");
        let name = work.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("input-"));
    }

    #[test]
    fn test_honors_work_root() {
        let root = tempfile::tempdir().unwrap();
        let work = WorkArea::plan(Some(root.path()), "report.docx");
        assert!(work.path().starts_with(root.path()));
    }

    #[tokio::test]
    async fn test_plan_creates_nothing() {
        let work = WorkArea::plan(None, "report.docx");
        assert!(!work.path().exists());
        work.cleanup().await;
    }

    #[tokio::test]
    async fn test_ensure_then_cleanup() {
        let root = tempfile::tempdir().unwrap();
        let work = WorkArea::plan(Some(root.path()), "report.docx");
        work.ensure_dir().await.unwrap();
        let path = work.path().to_path_buf();
        assert!(path.is_dir());

        tokio::fs::write(path.join("document.md"), "# hi").await.unwrap();
        work.cleanup().await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_cleanup_of_never_created_dir_is_silent() {
        let work = WorkArea::plan(None, "report.docx");
        work.cleanup().await;
    }

    #[test]
    fn test_drop_removes_leftovers() {
        let root = tempfile::tempdir().unwrap();
        let path;
        {
            let work = WorkArea::plan(Some(root.path()), "report.docx");
            std::fs::create_dir_all(work.path()).unwrap();
            path = work.path().to_path_buf();
        }
        assert!(!path.exists());
    }
}
