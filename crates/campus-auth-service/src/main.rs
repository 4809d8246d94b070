//! Campus Auth Service
//!
//! # Configuration
//!
//! - `JWT_SECRET` (required) - HMAC secret shared with the gateway
//! - `TOKEN_TTL_SECONDS` - token lifetime, default 1800
//! - `LISTEN_ADDR` - default `0.0.0.0:8000`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_auth::AuthConfig;
use campus_auth_service::{create_router, AuthServiceState, UserStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,campus=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Campus Auth Service");

    let secret = std::env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set")?;
    let mut auth = AuthConfig::new(secret);
    if let Ok(ttl) = std::env::var("TOKEN_TTL_SECONDS") {
        auth.token_ttl_seconds = ttl
            .trim()
            .parse()
            .map_err(|_| format!("invalid value for TOKEN_TTL_SECONDS: {ttl:?}"))?;
    }
    let listen_addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());

    let users = UserStore::with_default_admin(bcrypt::DEFAULT_COST)?;
    let app = create_router(AuthServiceState::new(users, &auth));

    tracing::info!(
        listen_addr = %listen_addr,
        token_ttl_seconds = auth.token_ttl_seconds,
        "Starting HTTP server"
    );
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Auth Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
