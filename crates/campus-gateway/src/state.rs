//! Gateway application state.
//!
//! This module defines the shared state that is available to all request
//! handlers. Everything in it is fixed at startup and only read afterwards.

use std::sync::Arc;

use campus_auth::TokenVerifier;
use campus_core::RouteTable;

use crate::config::GatewayConfig;
use crate::proxy::ProxyClient;

/// Shared application state for the gateway.
pub struct GatewayState<V>
where
    V: TokenVerifier,
{
    /// The routing table, in declared match order.
    pub routes: Arc<RouteTable>,
    /// The bearer token verifier.
    pub verifier: Arc<V>,
    /// Client used for downstream calls.
    pub proxy: ProxyClient,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<V> GatewayState<V>
where
    V: TokenVerifier,
{
    /// Create a new gateway state with a proxy client built from `config`.
    #[must_use]
    pub fn new(routes: RouteTable, verifier: Arc<V>, config: GatewayConfig) -> Self {
        let proxy = ProxyClient::new(config.request_timeout(), config.connect_timeout());
        Self::with_proxy(routes, verifier, proxy, config)
    }

    /// Create a new gateway state with an explicit proxy client.
    #[must_use]
    pub fn with_proxy(
        routes: RouteTable,
        verifier: Arc<V>,
        proxy: ProxyClient,
        config: GatewayConfig,
    ) -> Self {
        Self {
            routes: Arc::new(routes),
            verifier,
            proxy,
            config,
        }
    }
}

impl<V> Clone for GatewayState<V>
where
    V: TokenVerifier,
{
    fn clone(&self) -> Self {
        Self {
            routes: Arc::clone(&self.routes),
            verifier: Arc::clone(&self.verifier),
            proxy: self.proxy.clone(),
            config: self.config.clone(),
        }
    }
}
