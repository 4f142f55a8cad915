//! Shared, read-only server state

use library::{FormatTable, MediaLibrary};
use std::path::Path;
use std::sync::Arc;

use crate::resolver::PathResolver;

/// Server state handed to every request handler
///
/// Holds configuration only; nothing in here is mutated after startup.
#[derive(Clone)]
pub struct ServerState {
    library: Arc<MediaLibrary>,
    resolver: PathResolver,
}

impl ServerState {
    /// Create new server state
    ///
    /// # Arguments
    /// * `library` - Indexer for the media root; its root also scopes the resolver
    pub fn new(library: MediaLibrary) -> Self {
        let resolver = PathResolver::new(library.root());
        Self {
            library: Arc::new(library),
            resolver,
        }
    }

    /// Get the media library
    pub fn library(&self) -> &MediaLibrary {
        &self.library
    }

    /// Get the path resolver
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Get the extension table
    pub fn formats(&self) -> &FormatTable {
        self.library.formats()
    }

    /// Get the media root
    pub fn media_root(&self) -> &Path {
        self.library.root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_resolver_shares_library_root() {
        let library = MediaLibrary::new("/srv/media", FormatTable::default());
        let state = ServerState::new(library);

        assert_eq!(state.media_root(), Path::new("/srv/media"));
        assert_eq!(state.resolver().root(), &PathBuf::from("/srv/media"));
        assert!(state.formats().lookup("mp3").is_some());
    }
}
