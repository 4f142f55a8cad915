//! `Range: bytes=<start>-<end>` parsing and resolution

use std::str::FromStr;

use crate::error::AppError;

/// A single byte range as requested by the client, before the file size is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRequest {
    pub start: Option<u64>,
    /// Inclusive end offset
    pub end: Option<u64>,
}

/// A byte range resolved against a concrete file size
///
/// Always satisfies `start <= end < file_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSpan {
    pub start: u64,
    /// Inclusive end offset
    pub end: u64,
}

impl ByteSpan {
    /// Number of bytes covered by the span
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Value of the `Content-Range` header for this span
    pub fn content_range(&self, file_size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, file_size)
    }
}

impl RangeRequest {
    /// Parse a `Range` header value of the form `bytes=<start>-<end>`
    ///
    /// Either offset may be omitted, but not both. Multiple ranges are not
    /// supported.
    ///
    /// # Errors
    /// Returns `AppError::BadRange` for anything that is not a single
    /// numeric byte range.
    pub fn parse(header: &str) -> Result<Self, AppError> {
        let spec = header
            .trim()
            .strip_prefix("bytes=")
            .ok_or_else(|| AppError::BadRange("Invalid range format".to_string()))?;

        if spec.contains(',') {
            return Err(AppError::BadRange("Multiple ranges are not supported".to_string()));
        }

        let (start, end) = spec
            .split_once('-')
            .ok_or_else(|| AppError::BadRange("Invalid range format".to_string()))?;

        let start = parse_offset(start.trim(), "start")?;
        let end = parse_offset(end.trim(), "end")?;

        if start.is_none() && end.is_none() {
            return Err(AppError::BadRange("Empty range".to_string()));
        }

        Ok(Self { start, end })
    }

    /// Resolve the request against the size of the target file
    ///
    /// A missing start defaults to 0 and a missing end to the last byte. An
    /// end beyond the file is clamped to the last byte.
    ///
    /// # Errors
    /// Returns `AppError::RangeNotSatisfiable` if the range starts at or past
    /// the end of the file, or if start is greater than end.
    pub fn resolve(&self, file_size: u64) -> Result<ByteSpan, AppError> {
        if file_size == 0 {
            return Err(AppError::RangeNotSatisfiable(file_size));
        }

        let last = file_size - 1;
        let start = self.start.unwrap_or(0);
        let end = self.end.map_or(last, |end| end.min(last));

        if start > end || start >= file_size {
            return Err(AppError::RangeNotSatisfiable(file_size));
        }

        Ok(ByteSpan { start, end })
    }
}

impl FromStr for RangeRequest {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_offset(value: &str, which: &str) -> Result<Option<u64>, AppError> {
    if value.is_empty() {
        return Ok(None);
    }

    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::BadRange(format!("Invalid range {}", which)));
    }

    value
        .parse::<u64>()
        .map(Some)
        .map_err(|_| AppError::BadRange(format!("Invalid range {}", which)))
}
