//! Course Service for the campus platform.
//!
//! Serves an in-memory course catalogue under `/api/courses`. Like the
//! Student Service it sits behind the gateway and does no authentication of
//! its own.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod routes;
pub mod store;

pub use error::CourseError;
pub use routes::create_router;
pub use store::{Course, CourseStore, CourseUpdate, NewCourse};
