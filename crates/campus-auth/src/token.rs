//! Token encoding and verification.
//!
//! Verification runs in three steps, each mapped to one error:
//!
//! 1. structural decode of header and claims, else [`TokenError::MalformedToken`]
//! 2. expiry (`now >= exp`), else [`TokenError::Expired`]
//! 3. algorithm and HMAC check, else [`TokenError::InvalidSignature`]
//!
//! Expiry is checked before the signature, so an expired token reports
//! `Expired` whatever its signature. No clock leeway is applied.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use campus_core::Subject;

use crate::error::{Result, TokenError};
use crate::AuthConfig;

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user name).
    pub sub: String,
    /// Issued-at, UNIX seconds.
    pub iat: i64,
    /// Expiry, UNIX seconds.
    pub exp: i64,
}

/// A freshly issued token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The encoded bearer token.
    pub access_token: String,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Trait for verifying bearer tokens.
///
/// Implementations must be pure: no I/O and no shared mutable state, so a
/// single instance can serve any number of concurrent requests.
pub trait TokenVerifier: Send + Sync {
    /// Verify a token and return its subject.
    ///
    /// # Errors
    ///
    /// Returns `MalformedToken`, `Expired` or `InvalidSignature`.
    fn verify(&self, token: &str) -> Result<Subject>;
}

/// HS256 token codec.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    /// Create a codec from the shared secret.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        if config.secret.len() < AuthConfig::MIN_SECRET_LEN {
            tracing::warn!(
                len = config.secret.len(),
                min = AuthConfig::MIN_SECRET_LEN,
                "Token secret is shorter than recommended"
            );
        }

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    /// Issue a token for `subject` that expires after `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if `ttl` is out of range or encoding fails.
    pub fn issue(&self, subject: &Subject, ttl: Duration) -> Result<IssuedToken> {
        self.issue_at(subject, ttl, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if `ttl` is out of range or encoding fails.
    pub fn issue_at(
        &self,
        subject: &Subject,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|_| TokenError::Signing("ttl out of range".to_string()))?;
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing("ttl out of range".to_string()))?;

        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        tracing::debug!(subject = %subject, expires_at = %expires_at, "Issued token");

        Ok(IssuedToken {
            access_token,
            issued_at: now,
            expires_at,
        })
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedToken`, `Expired` or `InvalidSignature`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Subject> {
        let claims = Self::decode_unverified(token)?;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        let mut validation = Self::validation();
        validation.validate_exp = false;

        decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                _ => TokenError::MalformedToken(e.to_string()),
            }
        })?;

        Subject::parse(claims.sub).map_err(|e| TokenError::MalformedToken(e.to_string()))
    }

    /// Decode header and claims without checking the signature or expiry.
    fn decode_unverified(token: &str) -> Result<TokenClaims> {
        let mut validation = Self::validation();
        validation.validate_exp = false;
        validation.insecure_disable_signature_validation();

        decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::MalformedToken(e.to_string()))
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl TokenVerifier for TokenCodec {
    fn verify(&self, token: &str) -> Result<Subject> {
        self.verify_at(token, Utc::now())
    }
}
