//! Request dispatch.
//!
//! Every inbound request not claimed by the gateway's own endpoints passes
//! through [`dispatch`]:
//!
//! 1. resolve the path against the routing table (400 for `.` or `..`
//!    segments, 404 when nothing matches)
//! 2. on protected routes, verify the bearer credential (401 on any failure,
//!    before any downstream call)
//! 3. forward method, path suffix, query, filtered headers and body to the
//!    route's target, with the verified subject in [`SUBJECT_HEADER`]
//! 4. relay the downstream status, filtered headers and body, or turn a
//!    transport failure into 502/504
//!
//! Requests share nothing but the read-only state, so any number run
//! concurrently. If the client disconnects, axum drops this future and with
//! it the in-flight downstream call.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use tracing::Instrument;

use campus_auth::TokenVerifier;
use campus_core::{Subject, SUBJECT_HEADER};

use crate::auth::authenticate;
use crate::error::ApiError;
use crate::proxy::{strip_hop_by_hop, OutboundRequest};
use crate::state::GatewayState;

/// Fallback handler that routes, authenticates and proxies a request.
pub async fn dispatch<V>(
    State(state): State<Arc<GatewayState<V>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response
where
    V: TokenVerifier + 'static,
{
    let started = Instant::now();
    let span = tracing::info_span!("dispatch", method = %method, path = %uri.path());

    async move {
        let response = match proxy_request(&state, method, &uri, &headers, body).await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(error = %err, "Request failed at the gateway");
                err.into_response()
            }
        };

        tracing::info!(
            status = response.status().as_u16(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Request completed"
        );
        response
    }
    .instrument(span)
    .await
}

async fn proxy_request<V>(
    state: &GatewayState<V>,
    method: Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError>
where
    V: TokenVerifier,
{
    let route = state.routes.resolve(uri.path())?;
    tracing::debug!(
        prefix = %route.prefix(),
        requires_auth = route.requires_auth(),
        "Route matched"
    );

    let subject = if route.requires_auth() {
        let subject = authenticate(headers, state.verifier.as_ref())?;
        tracing::debug!(subject = %subject, "Credential verified");
        Some(subject)
    } else {
        None
    };

    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge {
                limit: state.config.max_body_bytes,
            }
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    })?;

    let request = OutboundRequest {
        method,
        url: route.target_url(uri.query()),
        headers: outbound_headers(headers, subject.as_ref())?,
        body,
    };

    state.proxy.forward(route.prefix(), request).await
}

/// Build the headers sent downstream.
///
/// Any client-supplied subject header is dropped so that only the gateway
/// can assert who is calling.
fn outbound_headers(headers: &HeaderMap, subject: Option<&Subject>) -> Result<HeaderMap, ApiError> {
    let mut outbound = strip_hop_by_hop(headers);
    outbound.remove(SUBJECT_HEADER);

    if let Some(subject) = subject {
        let value = HeaderValue::from_str(subject.as_str())
            .map_err(|e| ApiError::Internal(format!("subject is not a valid header: {e}")))?;
        outbound.insert(HeaderName::from_static(SUBJECT_HEADER), value);
    }
    Ok(outbound)
}
