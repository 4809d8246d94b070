//! Authenticating HTTP gateway for the campus services.
//!
//! This crate is the single entry point in front of the backend services.
//! It handles:
//!
//! - Prefix-based routing from a static, ordered routing table
//! - Local bearer token verification on protected routes
//! - Transparent proxying of method, path, query, headers and body
//! - Translation of routing, authentication and downstream failures into
//!   structured JSON errors
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Clients                               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      campus-gateway                          │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐   │
//! │  │  Routing    │ │   Bearer    │ │    HTTP             │   │
//! │  │  Table      │ │   Verifier  │ │    Proxy            │   │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                   ┌──────────┴──────────┐
//!                   ▼                     ▼
//!            ┌──────────────┐     ┌──────────────┐
//!            │ Auth Service │     │   Student    │
//!            │  (public)    │     │   Service    │
//!            └──────────────┘     └──────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use campus_auth::{AuthConfig, TokenCodec};
//! use campus_gateway::{create_router, GatewayConfig, GatewayState};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::default();
//! let routes = config.route_table()?;
//! let verifier = Arc::new(TokenCodec::new(&AuthConfig::new("shared-secret")));
//!
//! let state = GatewayState::new(routes, verifier, config);
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod proxy;
pub mod routes;
pub mod state;

pub use config::{ConfigError, GatewayConfig};
pub use error::ApiError;
pub use proxy::ProxyClient;
pub use routes::create_router;
pub use state::GatewayState;
