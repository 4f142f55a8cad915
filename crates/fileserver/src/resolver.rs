//! Safe resolution of client-supplied filenames inside the media root

use std::path::{Component, Path, PathBuf};

use crate::error::AppError;

/// Resolves filenames to absolute paths that stay inside the media root
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Create a resolver for the given media root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the media root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a filename to the canonical path of an existing file
    ///
    /// Both the root and the joined path are canonicalized before the
    /// prefix comparison, so `..` segments and symlinks pointing outside the
    /// root are rejected.
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Canonical path of a regular file under the root
    /// * `Err(AppError::NotFound)` - Traversal attempt, missing file or not a file
    pub async fn resolve(&self, filename: &str) -> Result<PathBuf, AppError> {
        let not_found = || AppError::NotFound("File not found".to_string());

        let candidate = Path::new(filename);
        if filename.is_empty()
            || candidate
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            tracing::warn!("Rejected media path: {:?}", filename);
            return Err(not_found());
        }

        let root = tokio::fs::canonicalize(&self.root).await.map_err(|e| {
            tracing::error!("Media root {} is not accessible: {}", self.root.display(), e);
            not_found()
        })?;

        let target = tokio::fs::canonicalize(root.join(candidate))
            .await
            .map_err(|_| not_found())?;

        if !target.starts_with(&root) {
            tracing::warn!("Rejected path outside media root: {}", target.display());
            return Err(not_found());
        }

        let metadata = tokio::fs::metadata(&target).await.map_err(|_| not_found())?;
        if !metadata.is_file() {
            return Err(not_found());
        }

        Ok(target)
    }
}
