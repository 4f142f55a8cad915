//! Supported media formats
//!
//! The extension table drives both the indexer allow-list and the
//! `Content-Type` chosen by the file server.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// MIME type used for anything outside the table
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Broad category of a media file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

/// A single entry of the extension table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFormat {
    /// Lower-case extension without the leading dot
    pub extension: &'static str,
    pub kind: MediaKind,
    pub mime: &'static str,
}

/// Extension -> {kind, MIME} lookup table
#[derive(Debug, Clone)]
pub struct FormatTable {
    formats: Vec<MediaFormat>,
}

impl Default for FormatTable {
    fn default() -> Self {
        Self::new(vec![
            MediaFormat { extension: "m4b", kind: MediaKind::Audio, mime: "audio/mp4" },
            MediaFormat { extension: "mp4", kind: MediaKind::Video, mime: "video/mp4" },
            MediaFormat { extension: "mp3", kind: MediaKind::Audio, mime: "audio/mpeg" },
            MediaFormat { extension: "wav", kind: MediaKind::Audio, mime: "audio/wav" },
            MediaFormat { extension: "m4a", kind: MediaKind::Audio, mime: "audio/mp4" },
        ])
    }
}

impl FormatTable {
    /// Create a table from explicit entries
    pub fn new(formats: Vec<MediaFormat>) -> Self {
        Self { formats }
    }

    /// Look up a format by extension (case-insensitive, leading dot optional)
    pub fn lookup(&self, extension: &str) -> Option<&MediaFormat> {
        let extension = extension.trim_start_matches('.');
        self.formats
            .iter()
            .find(|f| f.extension.eq_ignore_ascii_case(extension))
    }

    /// Look up the format of a path by its extension
    pub fn for_path(&self, path: &Path) -> Option<&MediaFormat> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| self.lookup(e))
    }

    /// MIME type for a path, falling back to `application/octet-stream`
    pub fn mime_for_path(&self, path: &Path) -> &'static str {
        self.for_path(path).map(|f| f.mime).unwrap_or(FALLBACK_MIME)
    }

    /// Check whether a path has an allow-listed extension
    pub fn is_supported(&self, path: &Path) -> bool {
        self.for_path(path).is_some()
    }
}
