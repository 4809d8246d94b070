//! Campus Gateway - authenticating HTTP entry point
//!
//! Routes every request by path prefix, verifies bearer tokens on protected
//! routes and proxies the call to the owning backend service.
//!
//! # Configuration
//!
//! Set `GATEWAY_CONFIG` to a JSON file, or use the individual variables
//! (`LISTEN_ADDR`, `AUTH_SERVICE_URL`, `STUDENT_SERVICE_URL`,
//! `COURSE_SERVICE_URL`, `REQUEST_TIMEOUT_SECONDS`, ...). `JWT_SECRET` must
//! match the secret the Auth Service signs with.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_auth::{AuthConfig, TokenCodec};
use campus_gateway::{create_router, GatewayConfig, GatewayState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,campus=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Campus Gateway");

    let config = GatewayConfig::from_env()?;
    let secret = std::env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set")?;

    tracing::info!(
        listen_addr = %config.listen_addr,
        request_timeout_seconds = config.request_timeout_seconds,
        routes = config.routes.len(),
        "Gateway configuration loaded"
    );
    for route in &config.routes {
        tracing::info!(
            prefix = %route.path_prefix,
            target = %route.target_base_url,
            requires_auth = route.requires_auth,
            "Route registered"
        );
    }

    let routes = config.route_table()?;
    let verifier = Arc::new(TokenCodec::new(&AuthConfig::new(secret)));
    let listen_addr = config.listen_addr.clone();

    let state = GatewayState::new(routes, verifier, config);
    let app = create_router(state);

    // Start HTTP server
    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
