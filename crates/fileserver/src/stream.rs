//! Range-serving responder
//!
//! Builds full (200) or partial (206) responses whose body is pulled from
//! the file lazily. The file handle lives inside the body stream, so it is
//! closed as soon as the stream finishes, fails, or is dropped because the
//! client went away.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, Take};
use tokio_util::io::ReaderStream;

use library::FormatTable;

use crate::error::AppError;
use crate::range::{ByteSpan, RangeRequest};

/// Read buffer size for streamed bodies
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Lazy byte stream over `[start, end]` of a file
pub type FileChunks = ReaderStream<Take<File>>;

/// A full or partial file response
#[derive(Debug)]
pub struct StreamResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub file_size: u64,
    /// Requested span; `None` for a full-content response
    pub span: Option<ByteSpan>,
    body: FileChunks,
}

impl StreamResponse {
    /// Number of bytes the body will yield
    pub fn content_length(&self) -> u64 {
        self.span.map_or(self.file_size, |span| span.len())
    }

    /// Response headers
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(self.content_length()));
        headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));

        if let Some(span) = self.span {
            if let Ok(value) = HeaderValue::from_str(&span.content_range(self.file_size)) {
                headers.insert(header::CONTENT_RANGE, value);
            }
        }

        headers
    }

    /// Take the body stream
    pub fn into_body(self) -> FileChunks {
        self.body
    }
}

impl IntoResponse for StreamResponse {
    fn into_response(self) -> Response {
        let status = self.status;
        let headers = self.headers();
        let body = Body::from_stream(self.into_body());

        (status, headers, body).into_response()
    }
}

/// Serve a resolved file, honouring an optional `Range` header value
///
/// # Arguments
/// * `path` - Absolute path returned by the resolver
/// * `range_header` - Raw value of the `Range` header, if any
/// * `formats` - Extension table used for `Content-Type`
///
/// # Errors
/// * `AppError::NotFound` if the file cannot be stat'ed or opened
/// * `AppError::BadRange` for a malformed range
/// * `AppError::RangeNotSatisfiable` if the range lies outside the file
pub async fn serve(
    path: &Path,
    range_header: Option<&str>,
    formats: &FormatTable,
) -> Result<StreamResponse, AppError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|_| AppError::NotFound("File not found".to_string()))?;
    let file_size = metadata.len();
    let content_type = formats.mime_for_path(path);

    let span = range_header
        .map(|value| RangeRequest::parse(value)?.resolve(file_size))
        .transpose()?;

    let mut file = File::open(path)
        .await
        .map_err(|_| AppError::NotFound("File not found".to_string()))?;

    let (status, reader) = match span {
        Some(span) => {
            file.seek(SeekFrom::Start(span.start))
                .await
                .map_err(|e| AppError::Internal(format!("Failed to seek file: {}", e)))?;

            tracing::debug!(
                "Serving {} bytes {}-{}/{}",
                path.display(),
                span.start,
                span.end,
                file_size
            );
            (StatusCode::PARTIAL_CONTENT, file.take(span.len()))
        }
        None => {
            tracing::debug!("Serving {} ({} bytes)", path.display(), file_size);
            (StatusCode::OK, file.take(file_size))
        }
    };

    Ok(StreamResponse {
        status,
        content_type,
        file_size,
        span,
        body: ReaderStream::with_capacity(reader, STREAM_CHUNK_SIZE),
    })
}
