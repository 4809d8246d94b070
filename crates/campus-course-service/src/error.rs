//! Error types for the Course Service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// A result type using `CourseError`.
pub type Result<T> = std::result::Result<T, CourseError>;

/// Errors returned by the Course Service endpoints.
#[derive(Debug, Error)]
pub enum CourseError {
    /// No course with this id.
    #[error("course {0} not found")]
    NotFound(u32),

    /// The request is malformed or fails validation.
    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl CourseError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code string for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
        }
    }
}

impl IntoResponse for CourseError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.code(),
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
