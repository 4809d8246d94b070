//! Shared state for the Auth Service.

use std::sync::Arc;
use std::time::Duration;

use campus_auth::{AuthConfig, TokenCodec};

use crate::users::UserStore;

/// State shared by all Auth Service handlers.
#[derive(Clone)]
pub struct AuthServiceState {
    /// Registered users.
    pub users: Arc<UserStore>,
    /// Token issuer.
    pub codec: Arc<TokenCodec>,
    /// Lifetime of issued tokens.
    pub token_ttl: Duration,
}

impl AuthServiceState {
    /// Create state from a user store and token configuration.
    #[must_use]
    pub fn new(users: UserStore, config: &AuthConfig) -> Self {
        Self {
            users: Arc::new(users),
            codec: Arc::new(TokenCodec::new(config)),
            token_ttl: config.token_ttl(),
        }
    }
}
