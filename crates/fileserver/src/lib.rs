//! HTTP File Server for streaming media library files
//!
//! This crate provides an HTTP server that lists the media library and
//! serves files from the media root with proper range request support for
//! audio and video seeking.

mod error;
mod range;
mod resolver;
mod server;
mod state;
mod stream;

pub use error::AppError;
pub use range::{ByteSpan, RangeRequest};
pub use resolver::PathResolver;
pub use server::{FileServerApi, StreamParams};
pub use state::ServerState;
pub use stream::{serve, FileChunks, StreamResponse, STREAM_CHUNK_SIZE};

/// Result type alias for file server operations
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
