//! Error types shared across crates.

use thiserror::Error;

/// Errors produced by the routing table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// No configured prefix matches the requested path.
    #[error("no route for path {0}")]
    NoRoute(String),

    /// The path contains a `.` or `..` segment.
    #[error("path {0} contains a dot segment")]
    DotSegment(String),

    /// A route entry is rejected at construction time.
    #[error("invalid route {prefix}: {reason}")]
    InvalidRoute {
        /// The offending prefix.
        prefix: String,
        /// Why the entry was rejected.
        reason: &'static str,
    },
}

/// Errors produced when parsing a [`Subject`](crate::Subject).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubjectError {
    /// The subject is empty.
    #[error("subject is empty")]
    Empty,

    /// The subject exceeds the maximum length.
    #[error("subject is longer than {max} bytes")]
    TooLong {
        /// Maximum accepted length in bytes.
        max: usize,
    },

    /// The subject contains whitespace, control or non-ASCII characters.
    #[error("subject contains an invalid character")]
    InvalidCharacter,
}
