//! Downstream HTTP forwarding.
//!
//! A single [`ProxyClient`] forwards any method, path, header set and body to
//! a resolved target URL and relays the answer. Connection-management
//! headers are dropped in both directions. Failed calls are never retried,
//! because the proxied request may not be idempotent.

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Method};
use axum::response::Response;

use campus_core::is_hop_by_hop;

use crate::error::ApiError;

/// A request ready to be sent downstream.
#[derive(Debug)]
pub struct OutboundRequest {
    /// HTTP method, copied from the inbound request.
    pub method: Method,
    /// Absolute target URL including the query string.
    pub url: String,
    /// Headers to send, already filtered.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Bytes,
}

/// HTTP client for downstream services.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
}

impl ProxyClient {
    /// Create a proxy client with the given timeouts.
    ///
    /// `request_timeout` bounds the whole downstream exchange, including
    /// reading the response body. Redirects are relayed, not followed.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created.
    #[must_use]
    pub fn new(request_timeout: Duration, connect_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Create a proxy client with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Send `request` downstream and relay the response.
    ///
    /// `prefix` names the matched route in errors and logs.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::DownstreamTimeout`] if the timeout elapses and
    /// [`ApiError::DownstreamUnreachable`] for any other transport failure.
    pub async fn forward(&self, prefix: &str, request: OutboundRequest) -> Result<Response, ApiError> {
        let response = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await
            .map_err(|e| downstream_error(prefix, &request.url, &e))?;

        let status = response.status();
        let headers = strip_hop_by_hop(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| downstream_error(prefix, &request.url, &e))?;

        tracing::debug!(
            url = %request.url,
            status = %status,
            bytes = body.len(),
            "Downstream responded"
        );

        let mut relayed = Response::new(Body::from(body));
        *relayed.status_mut() = status;
        *relayed.headers_mut() = headers;
        Ok(relayed)
    }
}

fn downstream_error(prefix: &str, url: &str, err: &reqwest::Error) -> ApiError {
    if err.is_timeout() {
        tracing::warn!(prefix = %prefix, url = %url, error = %err, "Downstream timed out");
        ApiError::DownstreamTimeout {
            prefix: prefix.to_string(),
        }
    } else {
        tracing::error!(prefix = %prefix, url = %url, error = %err, "Downstream unreachable");
        ApiError::DownstreamUnreachable {
            prefix: prefix.to_string(),
        }
    }
}

/// Copy `headers` without connection-management headers.
///
/// Besides the fixed hop-by-hop set, any header named in the message's own
/// `Connection` header is dropped.
#[must_use]
pub fn strip_hop_by_hop(headers: &HeaderMap) -> HeaderMap {
    let connection_tokens: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    let mut filtered = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !is_hop_by_hop(name.as_str(), &connection_tokens) {
            filtered.append(name.clone(), value.clone());
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn strips_fixed_and_connection_listed_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("gateway:8080"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, x-trace-hop"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert("x-trace-hop", HeaderValue::from_static("1"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));

        let filtered = strip_hop_by_hop(&headers);

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.get(header::CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(filtered.get(header::AUTHORIZATION).unwrap(), "Bearer t");
    }

    #[test]
    fn keeps_repeated_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));

        let filtered = strip_hop_by_hop(&headers);
        assert_eq!(filtered.get_all(header::SET_COOKIE).iter().count(), 2);
    }

    #[tokio::test]
    async fn unreachable_target_is_bad_gateway() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ProxyClient::new(Duration::from_secs(2), Duration::from_secs(1));
        let err = client
            .forward(
                "/students",
                OutboundRequest {
                    method: Method::GET,
                    url: format!("http://{addr}/api/students"),
                    headers: HeaderMap::new(),
                    body: Bytes::new(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::DownstreamUnreachable { .. }));
    }
}
