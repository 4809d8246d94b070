//! Header contract between the gateway and its backends.
//!
//! Backends must only be reachable through the gateway. Under that deployment
//! rule they may trust [`SUBJECT_HEADER`]: the gateway removes any copy sent
//! by a client and sets it only after the bearer credential has verified.

/// Header carrying the verified subject to downstream services.
pub const SUBJECT_HEADER: &str = "x-authenticated-user";

/// Headers that describe a single connection and are never forwarded.
///
/// `host` and `content-length` are included because the outbound HTTP stack
/// recomputes them for the new connection.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

/// Returns `true` if `name` is a connection-management header.
///
/// `connection_tokens` holds the comma-separated names listed in the message's
/// own `Connection` header, which are hop-by-hop for that message only.
#[must_use]
pub fn is_hop_by_hop(name: &str, connection_tokens: &[String]) -> bool {
    HOP_BY_HOP.iter().any(|h| h.eq_ignore_ascii_case(name))
        || connection_tokens
            .iter()
            .any(|token| token.eq_ignore_ascii_case(name))
}
