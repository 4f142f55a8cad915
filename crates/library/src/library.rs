//! Media library indexer

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cover::CoverClient;
use crate::error::{LibraryError, LibraryResult};
use crate::formats::{FormatTable, MediaKind};
use crate::metadata::{read_metadata, EmbeddedMetadata};
use crate::utils::{extract_catalog_id, format_of, title_from_filename};

/// One catalogued media file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    /// Display name (same as the filename)
    pub name: String,
    /// Filename within the media root, used to request the stream
    pub filename: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Lower-case extension without the dot
    pub format: String,
    /// Size in bytes
    pub size: u64,
    /// Duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    /// Catalog identifier found in the filename
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
}

/// Indexer for a flat directory of media files
#[derive(Debug, Clone)]
pub struct MediaLibrary {
    root: PathBuf,
    formats: FormatTable,
    covers: Option<CoverClient>,
}

impl MediaLibrary {
    /// Create a library without cover-art lookup
    ///
    /// # Arguments
    /// * `root` - Directory holding the media files
    /// * `formats` - Extension table used as the allow-list
    pub fn new(root: impl Into<PathBuf>, formats: FormatTable) -> Self {
        Self {
            root: root.into(),
            formats,
            covers: None,
        }
    }

    /// Enable cover-art lookup for files carrying a catalog identifier
    pub fn with_covers(mut self, covers: CoverClient) -> Self {
        self.covers = Some(covers);
        self
    }

    /// Get the media root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the extension table
    pub fn formats(&self) -> &FormatTable {
        &self.formats
    }

    /// Scan the media root and build a record for every supported file
    ///
    /// The root is created if it does not exist. Files whose metadata
    /// cannot be read are logged and skipped. Records are sorted by filename.
    ///
    /// # Errors
    /// Returns `LibraryError::Io` only if the directory itself cannot be
    /// created or listed.
    pub async fn list_media(&self) -> LibraryResult<Vec<MediaRecord>> {
        if !tokio::fs::try_exists(&self.root).await? {
            tracing::info!("Creating media directory {}", self.root.display());
            tokio::fs::create_dir_all(&self.root).await?;
            return Ok(Vec::new());
        }

        let root = tokio::fs::canonicalize(&self.root).await?;
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut records = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !self.formats.is_supported(&path) {
                continue;
            }

            let Some(filename) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!("Skipping non UTF-8 filename: {}", path.display());
                continue;
            };

            match self.index_file(&root, path, filename).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", entry.file_name().to_string_lossy(), e);
                }
            }
        }

        records.sort_by(|a, b| a.filename.cmp(&b.filename));
        tracing::debug!("Indexed {} media files in {}", records.len(), self.root.display());

        Ok(records)
    }

    /// Build the record for one file
    ///
    /// `None` if it is not a regular file, or if it is a link leading out
    /// of `root` (the stream endpoint would refuse to serve it).
    async fn index_file(
        &self,
        root: &Path,
        path: PathBuf,
        filename: String,
    ) -> LibraryResult<Option<MediaRecord>> {
        let target = tokio::fs::canonicalize(&path).await?;
        if !target.starts_with(root) {
            tracing::debug!("Skipping {}: resolves outside the media root", filename);
            return Ok(None);
        }

        let stat = tokio::fs::metadata(&target).await?;
        if !stat.is_file() {
            return Ok(None);
        }

        let Some(format) = self.formats.for_path(&path) else {
            return Ok(None);
        };
        let kind = format.kind;

        let EmbeddedMetadata {
            title,
            artist,
            album,
            duration,
        } = tokio::task::spawn_blocking(move || read_metadata(&path))
            .await
            .map_err(|e| LibraryError::Metadata(format!("Metadata task failed: {}", e)))??;

        let title = title.unwrap_or_else(|| title_from_filename(&filename));
        let isbn = extract_catalog_id(&filename);

        let cover_url = match (&self.covers, &isbn) {
            (Some(covers), Some(id)) => covers.cover_url(id, &title).await,
            _ => None,
        };

        Ok(Some(MediaRecord {
            name: filename.clone(),
            format: format_of(&filename),
            filename,
            title,
            artist,
            album,
            kind,
            size: stat.len(),
            duration,
            cover_url,
            isbn,
        }))
    }
}
