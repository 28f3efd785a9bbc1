use crate::domain::ports::CitationSource;
use crate::utils::error::{CffError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads citation files from the local filesystem, relative to `base_path`
/// unless the requested path is absolute.
#[derive(Debug, Clone)]
pub struct FileSource {
    base_path: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Default for FileSource {
    fn default() -> Self {
        Self::new(".")
    }
}

impl CitationSource for FileSource {
    fn read_to_string(&self, path: &str) -> Result<String> {
        let full_path = self.resolve(path);
        tracing::debug!("Reading {}", full_path.display());
        fs::read_to_string(&full_path).map_err(|source| CffError::IoError {
            path: display_path(&full_path),
            source,
        })
    }
}

fn display_path(path: &Path) -> String {
    path.strip_prefix(".")
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
