//! Saving and copying generated artifacts
//!
//! The host decides where text goes. [`DirectorySink`] writes downloads
//! into a directory; [`MemoryClipboard`] keeps the last copied text.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::codegen::Artifact;
use crate::error::{QuerySmithError, Result};

/// Destination for "save as file"
pub trait ArtifactSink {
    /// Save `text` under `filename` and return where it went
    ///
    /// # Errors
    ///
    /// Returns an error if the file name is unusable or the write fails
    fn save_as_file(&self, text: &str, filename: &str) -> Result<PathBuf>;
}

/// Destination for "copy to clipboard"
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard is unavailable
    async fn copy_to_clipboard(&self, text: &str) -> Result<()>;
}

/// Writes files into one directory, creating it on first use
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Sink writing into `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Target directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn check_file_name(filename: &str) -> Result<()> {
    let usable = !filename.trim().is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\']);
    if usable {
        Ok(())
    } else {
        Err(QuerySmithError::Export(format!(
            "Invalid file name: '{filename}'"
        )))
    }
}

impl ArtifactSink for DirectorySink {
    fn save_as_file(&self, text: &str, filename: &str) -> Result<PathBuf> {
        check_file_name(filename)?;
        fs::create_dir_all(&self.root)?;

        let path = self.root.join(filename);
        fs::write(&path, text)?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "Saved artifact");
        Ok(path)
    }
}

/// Clipboard kept in memory
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    /// Empty clipboard
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last copied text
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        *self.contents.lock() = Some(text.to_string());
        Ok(())
    }
}

/// Save every artifact under its download name
///
/// # Errors
///
/// Returns the first save failure
pub fn export_artifacts(sink: &dyn ArtifactSink, artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
    artifacts
        .iter()
        .map(|artifact| sink.save_as_file(&artifact.code, &artifact.file_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::ArtifactKind;

    #[test]
    fn test_directory_sink_creates_root() {
        let temp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(temp.path().join("out"));

        let path = sink.save_as_file("const x = 1\n", "get-users.ts").unwrap();
        assert_eq!(path, temp.path().join("out").join("get-users.ts"));
        assert_eq!(fs::read_to_string(path).unwrap(), "const x = 1\n");
    }

    #[test]
    fn test_rejects_path_like_names() {
        let temp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(temp.path());

        for name in ["", "..", "../escape.ts", "a/b.ts", r"a\b.ts"] {
            assert!(
                matches!(sink.save_as_file("x", name), Err(QuerySmithError::Export(_))),
                "accepted {name:?}"
            );
        }
    }

    #[test]
    fn test_export_artifacts() {
        let temp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(temp.path());
        let artifacts = vec![
            Artifact {
                kind: ArtifactKind::StandaloneFunction,
                file_name: "get-posts.ts".to_string(),
                code: "a".to_string(),
            },
            Artifact {
                kind: ArtifactKind::PageComponent,
                file_name: "get-posts-page.tsx".to_string(),
                code: "b".to_string(),
            },
        ];

        let paths = export_artifacts(&sink, &artifacts).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(fs::read_to_string(&paths[1]).unwrap(), "b");
    }

    #[tokio::test]
    async fn test_memory_clipboard() {
        let clipboard = MemoryClipboard::new();
        assert!(clipboard.contents().is_none());
        clipboard.copy_to_clipboard("copied").await.unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("copied"));
    }
}
