//! Health check endpoint.
//!
//! This module provides the public health check endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use campus_auth::TokenVerifier;

use crate::state::GatewayState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Configured routes in match order.
    pub routes: Vec<RouteSummary>,
}

/// Public view of a route.
#[derive(Debug, Serialize)]
pub struct RouteSummary {
    /// Path prefix.
    pub prefix: String,
    /// Whether a bearer credential is required.
    pub requires_auth: bool,
}

/// Health check handler.
///
/// Returns the current service status and the configured route prefixes.
/// Downstream addresses are not exposed. This endpoint is public and does
/// not contact any backend.
///
/// # Example
///
/// ```text
/// GET /health
///
/// Response: 200 OK
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "routes": [{"prefix": "/auth", "requires_auth": false}, ...]
/// }
/// ```
pub async fn health<V>(State(state): State<Arc<GatewayState<V>>>) -> impl IntoResponse
where
    V: TokenVerifier + 'static,
{
    let routes = state
        .routes
        .entries()
        .iter()
        .map(|entry| RouteSummary {
            prefix: entry.path_prefix.clone(),
            requires_auth: entry.requires_auth,
        })
        .collect();

    let response = HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        routes,
    };

    (StatusCode::OK, Json(response))
}
