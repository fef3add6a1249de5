//! Process configuration with environment overrides.

use serde::{Deserialize, Serialize};

/// Default upstream node REST endpoint.
pub const DEFAULT_UPSTREAM_ADDR: &str = "http://127.0.0.1:1317";

/// Default server bind address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Environment variable overriding the upstream REST endpoint.
pub const UPSTREAM_ADDR_VAR: &str = "UPSTREAM_ADDR";

/// Environment variable overriding the server bind address.
pub const LISTEN_ADDR_VAR: &str = "LISTEN_ADDR";

/// Application configuration.
///
/// Built once at startup and passed into the server and fetch client;
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the upstream node's REST endpoint.
    pub upstream_addr: String,
    /// Address the HTTP server binds to.
    pub listen_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upstream_addr: DEFAULT_UPSTREAM_ADDR.to_string(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

impl AppConfig {
    /// Create a configuration with explicit addresses.
    pub fn new(upstream_addr: impl Into<String>, listen_addr: impl Into<String>) -> Self {
        Self {
            upstream_addr: upstream_addr.into(),
            listen_addr: listen_addr.into(),
        }
    }

    /// Build from the process environment, falling back to defaults.
    ///
    /// Honors `UPSTREAM_ADDR` and `LISTEN_ADDR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            upstream_addr: lookup(UPSTREAM_ADDR_VAR)
                .unwrap_or_else(|| DEFAULT_UPSTREAM_ADDR.to_string()),
            listen_addr: lookup(LISTEN_ADDR_VAR)
                .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
        }
    }

    /// Override the upstream address.
    pub fn with_upstream_addr(mut self, addr: impl Into<String>) -> Self {
        self.upstream_addr = addr.into();
        self
    }

    /// Override the listen address.
    pub fn with_listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = addr.into();
        self
    }
}
