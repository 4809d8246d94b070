//! API error types and responses.
//!
//! Every failure in the request path ends up here and is rendered as
//! `{"error": <kind>, "message": <string>}` with a matching status code.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use campus_auth::TokenError;
use campus_core::RouteError;

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No route matches the request path.
    #[error("no route for {0}")]
    NoRoute(String),

    /// A protected route was called without a bearer credential.
    #[error("missing bearer credential")]
    MissingCredential,

    /// The bearer credential failed verification.
    ///
    /// The message is the same for every verification failure; the cause is
    /// only logged.
    #[error("invalid or expired credential")]
    InvalidCredential(#[source] TokenError),

    /// The downstream service could not be reached or failed mid-response.
    #[error("service behind {prefix} is unreachable")]
    DownstreamUnreachable {
        /// Prefix of the matched route.
        prefix: String,
    },

    /// The downstream service did not answer within the timeout.
    #[error("service behind {prefix} timed out")]
    DownstreamTimeout {
        /// Prefix of the matched route.
        prefix: String,
    },

    /// The request body exceeds the configured limit.
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge {
        /// Maximum accepted body size.
        limit: usize,
    },

    /// The request path contains a `.` or `..` segment.
    #[error("path {0} contains a dot segment")]
    DotSegment(String),

    /// The request could not be read.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl ApiError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NoRoute(_) => StatusCode::NOT_FOUND,
            Self::MissingCredential | Self::InvalidCredential(_) => StatusCode::UNAUTHORIZED,
            Self::DownstreamUnreachable { .. } => StatusCode::BAD_GATEWAY,
            Self::DownstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::DotSegment(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoRoute(_) => "not_found",
            Self::MissingCredential | Self::InvalidCredential(_) => "unauthorized",
            Self::DownstreamUnreachable { .. } => "bad_gateway",
            Self::DownstreamTimeout { .. } => "gateway_timeout",
            Self::PayloadTooLarge { .. } => "payload_too_large",
            Self::DotSegment(_) | Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
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

impl From<RouteError> for ApiError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::NoRoute(path) => Self::NoRoute(path),
            RouteError::DotSegment(path) => Self::DotSegment(path),
            RouteError::InvalidRoute { .. } => {
                tracing::error!(error = %err, "Invalid route reached request path");
                Self::Internal("routing configuration error".to_string())
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        if err.is_rejection() {
            Self::InvalidCredential(err)
        } else {
            tracing::error!(error = %err, "Token internal error");
            Self::Internal("authentication error".to_string())
        }
    }
}
