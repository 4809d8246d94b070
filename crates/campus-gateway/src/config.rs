//! Gateway configuration types.
//!
//! Configuration is read once at startup, either from a JSON file named by
//! `GATEWAY_CONFIG` or from individual environment variables, and is never
//! mutated afterwards.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use campus_core::{RouteEntry, RouteError, RouteTable};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue {
        /// The variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for this schema.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path of the file.
        path: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// A route entry is invalid.
    #[error(transparent)]
    Route(#[from] RouteError),
}

/// Configuration for the gateway service.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Listen address (e.g., "0.0.0.0:8080").
    #[serde(default = "GatewayConfig::default_listen_addr")]
    pub listen_addr: String,

    /// Allowed CORS origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    #[serde(default = "GatewayConfig::default_max_body")]
    pub max_body_bytes: usize,

    /// Overall timeout for a downstream call, in seconds.
    #[serde(default = "GatewayConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Timeout for establishing a downstream connection, in seconds.
    #[serde(default = "GatewayConfig::default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Routes in match order.
    #[serde(default = "GatewayConfig::default_routes")]
    pub routes: Vec<RouteEntry>,
}

impl GatewayConfig {
    fn default_listen_addr() -> String {
        "0.0.0.0:8080".to_string()
    }

    const fn default_max_body() -> usize {
        1024 * 1024 // 1 MB
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    const fn default_connect_timeout() -> u64 {
        5
    }

    fn default_routes() -> Vec<RouteEntry> {
        Self::service_routes("http://localhost:8000", "http://localhost:8001", None)
    }

    /// The standard route set: public auth endpoints, protected student and
    /// (optionally) course endpoints.
    #[must_use]
    pub fn service_routes(
        auth_url: &str,
        student_url: &str,
        course_url: Option<&str>,
    ) -> Vec<RouteEntry> {
        let mut routes = vec![
            RouteEntry::public("/auth", auth_url.trim_end_matches('/')),
            RouteEntry::protected(
                "/students",
                format!("{}/api/students", student_url.trim_end_matches('/')),
            ),
        ];
        if let Some(course_url) = course_url {
            routes.push(RouteEntry::protected(
                "/courses",
                format!("{}/api/courses", course_url.trim_end_matches('/')),
            ));
        }
        routes
    }

    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed, the file named by
    /// `GATEWAY_CONFIG` cannot be loaded, or a route is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` to read variables.
    ///
    /// # Errors
    ///
    /// See [`GatewayConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("GATEWAY_CONFIG") {
            return Self::from_file(path);
        }

        let mut config = Self::default();

        if let Some(addr) = lookup("LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        config.max_body_bytes = parse_var(&lookup, "MAX_BODY_BYTES", config.max_body_bytes)?;
        config.request_timeout_seconds = parse_var(
            &lookup,
            "REQUEST_TIMEOUT_SECONDS",
            config.request_timeout_seconds,
        )?;
        config.connect_timeout_seconds = parse_var(
            &lookup,
            "CONNECT_TIMEOUT_SECONDS",
            config.connect_timeout_seconds,
        )?;

        let auth_url = lookup("AUTH_SERVICE_URL").unwrap_or_else(|| "http://localhost:8000".into());
        let student_url =
            lookup("STUDENT_SERVICE_URL").unwrap_or_else(|| "http://localhost:8001".into());
        let course_url = lookup("COURSE_SERVICE_URL");
        config.routes = Self::service_routes(&auth_url, &student_url, course_url.as_deref());

        config.route_table()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a route is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })?;

        config.route_table()?;
        Ok(config)
    }

    /// Build the routing table from the configured routes.
    ///
    /// # Errors
    ///
    /// Returns an error if a route entry is invalid.
    pub fn route_table(&self) -> Result<RouteTable, RouteError> {
        RouteTable::new(self.routes.clone())
    }

    /// Get the downstream request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Get the downstream connect timeout as a `Duration`.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: Self::default_listen_addr(),
            cors_origins: vec!["*".to_string()],
            max_body_bytes: Self::default_max_body(),
            request_timeout_seconds: Self::default_request_timeout(),
            connect_timeout_seconds: Self::default_connect_timeout(),
            routes: Self::default_routes(),
        }
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::InvalidValue { var, value }),
        },
        None => Ok(default),
    }
}
