//! Error types for the Auth Service.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// A result type using `ServiceError`.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors returned by the Auth Service endpoints.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Unknown user or wrong password.
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// Registration for a name that is already taken.
    #[error("username already exists")]
    UserExists,

    /// The username cannot be used as a token subject.
    #[error("invalid username: {0}")]
    InvalidUsername(String),

    /// The request body could not be parsed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl ServiceError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::UserExists | Self::InvalidUsername(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "unauthorized",
            Self::UserExists => "user_exists",
            Self::InvalidUsername(_) => "invalid_username",
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.code(),
            message: self.to_string(),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<bcrypt::BcryptError> for ServiceError {
    fn from(err: bcrypt::BcryptError) -> Self {
        tracing::error!(error = %err, "Password hashing failed");
        Self::Internal("password hashing failed".to_string())
    }
}

impl From<campus_auth::TokenError> for ServiceError {
    fn from(err: campus_auth::TokenError) -> Self {
        tracing::error!(error = %err, "Token issuing failed");
        Self::Internal("token issuing failed".to_string())
    }
}
