//! The gateway-verified caller.
//!
//! The gateway replaces any client-supplied `x-authenticated-user` header
//! with the subject of a verified bearer token. This service is reachable
//! only through the gateway, so it takes the header at face value.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use campus_core::{Subject, SUBJECT_HEADER};

/// The subject the gateway authenticated, if any.
#[derive(Debug, Clone)]
pub struct Caller(pub Option<Subject>);

impl Caller {
    /// Subject name for logging, `-` when absent.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.as_ref().map_or("-", Subject::as_str)
    }
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(SUBJECT_HEADER) else {
            return Ok(Self(None));
        };

        let subject = value
            .to_str()
            .ok()
            .and_then(|v| Subject::parse(v).ok());
        if subject.is_none() {
            tracing::warn!("Ignoring unparseable {SUBJECT_HEADER} header");
        }
        Ok(Self(subject))
    }
}
