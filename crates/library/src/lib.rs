//! Media library indexer
//!
//! This crate scans a flat media directory, filters files against a
//! supported-format table, reads embedded tags and duration, and optionally
//! enriches records with cover art looked up by the catalog identifier
//! embedded in the filename.

pub mod cover;
pub mod error;
pub mod formats;
pub mod library;
pub mod metadata;
pub mod utils;

pub use cover::CoverClient;
pub use error::{LibraryError, LibraryResult};
pub use formats::{FormatTable, MediaFormat, MediaKind, FALLBACK_MIME};
pub use library::{MediaLibrary, MediaRecord};
pub use utils::extract_catalog_id;
