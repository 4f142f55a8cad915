use std::fmt;

/// Error type for library indexing operations
#[derive(Debug)]
pub enum LibraryError {
    /// Filesystem error while reading the media directory
    Io(std::io::Error),
    /// Embedded metadata could not be parsed
    Metadata(String),
    /// Cover-art lookup failed
    Cover(String),
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Io(e) => write!(f, "I/O error: {}", e),
            LibraryError::Metadata(msg) => write!(f, "Metadata parse failure: {}", msg),
            LibraryError::Cover(msg) => write!(f, "Cover lookup failure: {}", msg),
        }
    }
}

impl std::error::Error for LibraryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LibraryError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::Io(err)
    }
}

impl From<symphonia::core::errors::Error> for LibraryError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        LibraryError::Metadata(err.to_string())
    }
}

impl From<reqwest::Error> for LibraryError {
    fn from(err: reqwest::Error) -> Self {
        LibraryError::Cover(err.to_string())
    }
}

/// Result type alias for library operations
pub type LibraryResult<T> = Result<T, LibraryError>;
