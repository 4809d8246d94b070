//! Core types shared by the campus gateway and its backend services.
//!
//! This crate provides the foundational types used throughout the workspace:
//!
//! - **Subject**: the validated identity carried by a credential
//! - **Routing table**: the static, ordered mapping from path prefixes to
//!   downstream services
//! - **Header contract**: the header the gateway uses to tell backends who is
//!   calling, and the hop-by-hop headers that are never forwarded
//!
//! # Example
//!
//! ```
//! use campus_core::{RouteEntry, RouteTable};
//!
//! let table = RouteTable::new(vec![
//!     RouteEntry::public("/auth", "http://localhost:8000"),
//!     RouteEntry::protected("/students", "http://localhost:8001/api/students"),
//! ]).unwrap();
//!
//! let route = table.resolve("/students/7").unwrap();
//! assert!(route.requires_auth());
//! assert_eq!(route.target_url(Some("page=2")), "http://localhost:8001/api/students/7?page=2");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod headers;
pub mod routing;
pub mod subject;

pub use error::{RouteError, SubjectError};
pub use headers::{is_hop_by_hop, SUBJECT_HEADER};
pub use routing::{ResolvedRoute, RouteEntry, RouteTable};
pub use subject::Subject;
