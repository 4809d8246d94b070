//! Router configuration.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AuthServiceState;

/// Create the Auth Service router.
///
/// # Routes
///
/// - `POST /login` - Exchange credentials for a bearer token
/// - `POST /register` - Create a user with the `user` role
/// - `GET /health` - Health check
pub fn create_router(state: AuthServiceState) -> Router {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/register", post(handlers::register))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
