//! Student Service for the campus platform.
//!
//! Serves in-memory student records under `/api/students`. The service does
//! no authentication of its own: it is deployed behind the gateway, which
//! verifies bearer tokens and passes the caller's subject in the
//! `x-authenticated-user` header.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod caller;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod store;

pub use caller::Caller;
pub use error::ServiceError;
pub use routes::create_router;
pub use store::{NewStudent, Student, StudentStore, StudentUpdate};
