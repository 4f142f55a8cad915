//! Error responses for the file server

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::fmt;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Required query parameter was not supplied
    MissingParameter(String),
    /// File could not be resolved inside the media root
    NotFound(String),
    /// `Range` header could not be parsed
    BadRange(String),
    /// Range does not overlap the file; carries the file size
    RangeNotSatisfiable(u64),
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingParameter(_) | AppError::BadRange(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RangeNotSatisfiable(_) => StatusCode::RANGE_NOT_SATISFIABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MissingParameter(msg) => write!(f, "{}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::BadRange(msg) => write!(f, "Invalid range: {}", msg),
            AppError::RangeNotSatisfiable(size) => {
                write!(f, "Range not satisfiable. File size: {}", size)
            }
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<library::LibraryError> for AppError {
    fn from(err: library::LibraryError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}: {}", status, self);
        }

        match self {
            AppError::RangeNotSatisfiable(size) => (
                status,
                [(header::CONTENT_RANGE, format!("bytes */{}", size))],
                self.to_string(),
            )
                .into_response(),
            _ => (status, self.to_string()).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::MissingParameter("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::BadRange("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::RangeNotSatisfiable(10).status(),
            StatusCode::RANGE_NOT_SATISFIABLE
        );
        assert_eq!(
            AppError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unsatisfiable_carries_content_range() {
        let response = AppError::RangeNotSatisfiable(1000).into_response();
        assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(response.headers()[header::CONTENT_RANGE], "bytes */1000");
    }
}
