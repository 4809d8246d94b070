//! Auth Service for the campus platform.
//!
//! Exchanges a username and password for a signed bearer token that the
//! gateway verifies locally. Users are kept in memory with bcrypt hashes and
//! a default `admin` account is seeded at startup.
//!
//! # Example
//!
//! ```no_run
//! use campus_auth::AuthConfig;
//! use campus_auth_service::{create_router, AuthServiceState, UserStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let users = UserStore::with_default_admin(bcrypt::DEFAULT_COST)?;
//! let state = AuthServiceState::new(users, &AuthConfig::new("shared-secret"));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, create_router(state)).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod users;

pub use error::ServiceError;
pub use routes::create_router;
pub use state::AuthServiceState;
pub use users::{Role, User, UserStore};
