//! Bearer credential enforcement.
//!
//! Protected routes need an `Authorization: Bearer <token>` header whose
//! token passes [`TokenVerifier::verify`]. Verification is local; the Auth
//! Service is never contacted per request.

use axum::http::{header, HeaderMap};

use campus_auth::TokenVerifier;
use campus_core::Subject;

use crate::error::ApiError;

/// Extract the bearer token from the `Authorization` header.
///
/// The scheme is matched case-insensitively. A missing header, another
/// scheme, or an empty token all yield `None`.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Verify the request's bearer credential and return its subject.
///
/// # Errors
///
/// Returns [`ApiError::MissingCredential`] when no bearer token is present and
/// [`ApiError::InvalidCredential`] when verification fails.
pub fn authenticate<V>(headers: &HeaderMap, verifier: &V) -> Result<Subject, ApiError>
where
    V: TokenVerifier + ?Sized,
{
    let token = bearer_token(headers).ok_or(ApiError::MissingCredential)?;

    verifier.verify(token).map_err(|err| {
        tracing::debug!(reason = %err, "Rejected bearer credential");
        ApiError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::HeaderValue;
    use campus_auth::{AuthConfig, TokenCodec, TokenError};

    use super::*;

    fn headers(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(authorization).unwrap(),
        );
        headers
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(&AuthConfig::new("gateway-test-secret-0123456789abcdef"))
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("BEARER  abc ")), Some("abc"));
    }

    #[test]
    fn ignores_other_schemes_and_empty_tokens() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("abc.def.ghi")), None);
    }

    #[test]
    fn authenticates_valid_token() {
        let codec = codec();
        let subject = Subject::parse("alice").unwrap();
        let issued = codec.issue(&subject, Duration::from_secs(60)).unwrap();

        let headers = headers(&format!("Bearer {}", issued.access_token));
        assert_eq!(authenticate(&headers, &codec).unwrap(), subject);
    }

    #[test]
    fn missing_header_is_missing_credential() {
        let err = authenticate(&HeaderMap::new(), &codec()).unwrap_err();
        assert!(matches!(err, ApiError::MissingCredential));
    }

    #[test]
    fn bad_token_is_invalid_credential() {
        let err = authenticate(&headers("Bearer nonsense"), &codec()).unwrap_err();
        assert!(matches!(
            err,
            ApiError::InvalidCredential(TokenError::MalformedToken(_))
        ));
    }
}
