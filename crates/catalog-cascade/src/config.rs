//! Resolver and gateway configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_TTL_SECS;
use crate::types::EntityKind;

/// Cascade resolver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// How long a fetched catalog is served from cache, in seconds.
    #[serde(default = "default_ttl")]
    pub cache_ttl_secs: u64,

    /// Whether `load_all` also loads learning units.
    #[serde(default)]
    pub load_learning_units: bool,
}

fn default_ttl() -> u64 {
    DEFAULT_TTL_SECS
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_ttl(),
            load_learning_units: false,
        }
    }
}

impl ResolverConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `CATALOG_CACHE_TTL` | Cache TTL in seconds (default: 300) |
    /// | `CATALOG_LOAD_LEARNING_UNITS` | Load learning units in `load_all` |
    pub fn from_env() -> Self {
        Self {
            cache_ttl_secs: std::env::var("CATALOG_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_ttl),
            load_learning_units: std::env::var("CATALOG_LOAD_LEARNING_UNITS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Set the cache TTL. The TTL is kept in whole seconds; a fractional
    /// part rounds up, so a non-zero TTL never turns the cache off.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
        self
    }

    /// Load learning units as part of `load_all`.
    pub fn with_learning_units(mut self, enabled: bool) -> Self {
        self.load_learning_units = enabled;
        self
    }
}

/// Endpoint paths, relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointPaths {
    pub grade_levels: String,
    pub subjects: String,
    pub classes: String,
    pub learning_units: String,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            grade_levels: "grade-levels".to_string(),
            subjects: "subjects".to_string(),
            classes: "classes".to_string(),
            learning_units: "learning-units".to_string(),
        }
    }
}

impl EndpointPaths {
    pub fn for_kind(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::GradeLevel => &self.grade_levels,
            EntityKind::Subject => &self.subjects,
            EntityKind::Class => &self.classes,
            EntityKind::LearningUnit => &self.learning_units,
        }
    }
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the catalog API.
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub paths: EndpointPaths,
}

fn default_api_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: default_timeout(),
            paths: EndpointPaths::default(),
        }
    }
}

impl GatewayConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `CATALOG_API_URL` | Catalog API base URL |
    /// | `CATALOG_API_TIMEOUT` | Request timeout in seconds (default: 30) |
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("CATALOG_API_URL").unwrap_or_else(|_| default_api_url()),
            timeout_secs: std::env::var("CATALOG_API_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout),
            paths: EndpointPaths::default(),
        }
    }

    /// Set the base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Override endpoint paths.
    pub fn with_paths(mut self, paths: EndpointPaths) -> Self {
        self.paths = paths;
        self
    }
}
