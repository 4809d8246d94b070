//! Static routing table.
//!
//! Maps URL path prefixes to downstream base URLs. The table is built once at
//! startup and is read-only afterwards, so it can be shared across requests
//! behind an `Arc` without locking.
//!
//! # Matching
//!
//! Entries are tried in declared order and the first match wins, even when a
//! later entry has a longer matching prefix. A prefix matches a path when the
//! path equals the prefix, when the path continues the prefix with a `/`, or
//! when the prefix itself ends in `/` and the path starts with it. So
//! `/students` matches `/students` and `/students/7` but not `/studentsx`.
//!
//! Paths containing `.` or `..` segments, raw or percent-encoded, never
//! resolve. The downstream URL parser would collapse them after matching,
//! letting a path under one prefix land on another route's target.

use serde::{Deserialize, Serialize};

use crate::error::RouteError;

/// A single routing rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Path prefix, starting with `/`.
    pub path_prefix: String,
    /// Base URL the matched suffix is appended to.
    pub target_base_url: String,
    /// Whether a valid bearer credential is required.
    #[serde(default = "RouteEntry::default_requires_auth")]
    pub requires_auth: bool,
}

impl RouteEntry {
    /// Create an entry that does not require authentication.
    #[must_use]
    pub fn public(path_prefix: impl Into<String>, target_base_url: impl Into<String>) -> Self {
        Self {
            path_prefix: path_prefix.into(),
            target_base_url: target_base_url.into(),
            requires_auth: false,
        }
    }

    /// Create an entry that requires a valid bearer credential.
    #[must_use]
    pub fn protected(path_prefix: impl Into<String>, target_base_url: impl Into<String>) -> Self {
        Self {
            path_prefix: path_prefix.into(),
            target_base_url: target_base_url.into(),
            requires_auth: true,
        }
    }

    const fn default_requires_auth() -> bool {
        true
    }

    /// Returns the remainder of `path` after this prefix, if it matches.
    fn strip<'p>(&self, path: &'p str) -> Option<&'p str> {
        let rest = path.strip_prefix(self.path_prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') || self.path_prefix.ends_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    fn validate(&self) -> Result<(), RouteError> {
        let invalid = |reason| RouteError::InvalidRoute {
            prefix: self.path_prefix.clone(),
            reason,
        };

        if !self.path_prefix.starts_with('/') {
            return Err(invalid("path prefix must start with '/'"));
        }
        if !(self.target_base_url.starts_with("http://")
            || self.target_base_url.starts_with("https://"))
        {
            return Err(invalid("target must be an http:// or https:// URL"));
        }
        Ok(())
    }
}

/// Ordered, immutable set of route entries.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Build a table, preserving declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidRoute`] if a prefix does not start with `/`
    /// or a target is not an HTTP(S) URL.
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, RouteError> {
        for entry in &entries {
            entry.validate()?;
        }
        Ok(Self { entries })
    }

    /// Resolve a request path to its route.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::DotSegment`] when the path contains a `.` or
    /// `..` segment and [`RouteError::NoRoute`] when no prefix matches.
    pub fn resolve<'a, 'p>(&'a self, path: &'p str) -> Result<ResolvedRoute<'a, 'p>, RouteError> {
        if has_dot_segment(path) {
            return Err(RouteError::DotSegment(path.to_string()));
        }

        self.entries
            .iter()
            .find_map(|entry| {
                entry.strip(path).map(|suffix| ResolvedRoute { entry, suffix })
            })
            .ok_or_else(|| RouteError::NoRoute(path.to_string()))
    }

    /// The configured entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Number of configured entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no routes are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The outcome of a successful [`RouteTable::resolve`].
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRoute<'a, 'p> {
    entry: &'a RouteEntry,
    suffix: &'p str,
}

impl ResolvedRoute<'_, '_> {
    /// The matched entry.
    #[must_use]
    pub fn entry(&self) -> &RouteEntry {
        self.entry
    }

    /// The matched prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.entry.path_prefix
    }

    /// The downstream base URL.
    #[must_use]
    pub fn target_base_url(&self) -> &str {
        &self.entry.target_base_url
    }

    /// Whether the matched route requires a credential.
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        self.entry.requires_auth
    }

    /// The part of the request path after the prefix.
    #[must_use]
    pub fn suffix(&self) -> &str {
        self.suffix
    }

    /// Build the outbound URL: base URL, path suffix, then the query string.
    #[must_use]
    pub fn target_url(&self, query: Option<&str>) -> String {
        let base = self.entry.target_base_url.trim_end_matches('/');
        let suffix = if self.suffix.is_empty() || self.suffix.starts_with('/') {
            self.suffix.to_string()
        } else {
            format!("/{}", self.suffix)
        };
        match query {
            Some(q) if !q.is_empty() => format!("{base}{suffix}?{q}"),
            _ => format!("{base}{suffix}"),
        }
    }
}
/// Returns `true` if any segment of `path` is `.` or `..`.
///
/// `%2e` counts as a dot in any case, and `\` separates segments as well,
/// matching how URL parsers treat special schemes.
fn has_dot_segment(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}
