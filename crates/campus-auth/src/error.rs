//! Token error types.

use thiserror::Error;

/// A result type using `TokenError`.
pub type Result<T> = std::result::Result<T, TokenError>;

/// Errors that can occur while issuing or verifying a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token cannot be parsed into the expected structure.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The signature does not verify against the shared secret.
    #[error("invalid signature")]
    InvalidSignature,

    /// The current time is at or past the token's expiry.
    #[error("token expired")]
    Expired,

    /// The token could not be produced.
    #[error("signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    /// Returns `true` for failures caused by the presented credential.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(self, Self::Signing(_))
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::MalformedToken(_) | Self::InvalidSignature | Self::Expired => 401,
            Self::Signing(_) => 500,
        }
    }
}
