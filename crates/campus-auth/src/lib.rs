//! Bearer token issuing and verification for the campus services.
//!
//! Tokens are compact JWTs signed with HMAC-SHA256 using a secret shared
//! out-of-band between the Auth Service (which issues them) and the gateway
//! (which verifies them). Verification is a pure function of the token, the
//! secret and the clock, so the gateway never calls the Auth Service per
//! request.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  issue   ┌──────────────────┐
//! │   Auth Service   │─────────▶│    TokenCodec    │
//! └──────────────────┘          └────────▲─────────┘
//!                                        │ verify
//! ┌──────────────────┐          ┌────────┴─────────┐
//! │   Gateway        │─────────▶│  TokenVerifier   │
//! │   (HTTP)         │          │  (trait)         │
//! └──────────────────┘          └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use campus_auth::{AuthConfig, TokenCodec, TokenVerifier};
//! use campus_core::Subject;
//!
//! let codec = TokenCodec::new(&AuthConfig::new("0123456789abcdef0123456789abcdef"));
//! let subject = Subject::parse("admin").unwrap();
//!
//! let issued = codec.issue(&subject, Duration::from_secs(60)).unwrap();
//! assert_eq!(codec.verify(&issued.access_token).unwrap(), subject);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod token;

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

pub use error::{Result, TokenError};
pub use token::{IssuedToken, TokenClaims, TokenCodec, TokenVerifier};

/// Configuration shared by token issuers and verifiers.
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret shared between the Auth Service and the gateway.
    pub secret: String,

    /// Lifetime of issued tokens, in seconds.
    #[serde(default = "AuthConfig::default_token_ttl")]
    pub token_ttl_seconds: u64,
}

impl AuthConfig {
    /// Recommended minimum secret length for HS256.
    pub const MIN_SECRET_LEN: usize = 32;

    /// Create a configuration with the default token lifetime.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_ttl_seconds: Self::default_token_ttl(),
        }
    }

    const fn default_token_ttl() -> u64 {
        30 * 60
    }

    /// Get the token lifetime as a `Duration`.
    #[must_use]
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_seconds)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}
