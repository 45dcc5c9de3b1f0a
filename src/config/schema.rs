//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the catalog proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the catalog proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream catalog service endpoints.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Detail enrichment settings.
    pub enrichment: EnrichmentConfig,

    /// Defaults applied to incoming search queries.
    pub query: QueryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream catalog service configuration.
///
/// The defaults target the Open Library search API, whose search endpoint
/// returns every match in a `docs` array keyed by `key` (e.g. `/works/OL45804W`)
/// and whose detail records live at `{key}.json`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the catalog service (scheme + host, optional path prefix).
    pub base_url: String,

    /// Path of the query-by-text endpoint.
    pub search_path: String,

    /// Query string parameter carrying the search text.
    pub query_param: String,

    /// Field of the search response holding the result array.
    pub results_field: String,

    /// Field of each result holding its identifier.
    pub id_field: String,

    /// Path template of the detail endpoint; `{id}` is replaced by the identifier.
    pub detail_path: String,

    /// User-Agent sent on every upstream request.
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openlibrary.org".to_string(),
            search_path: "/search.json".to_string(),
            query_param: "q".to_string(),
            results_field: "docs".to_string(),
            id_field: "key".to_string(),
            detail_path: "/{id}.json".to_string(),
            user_agent: concat!("catalog-proxy/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Timeout configuration for upstream calls and whole requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for the full result-set fetch, in milliseconds.
    pub list_ms: u64,

    /// Deadline for each per-item detail fetch, in milliseconds.
    pub detail_ms: u64,

    /// Overall request timeout enforced by the HTTP layer, in seconds.
    pub request_secs: u64,
}

impl TimeoutConfig {
    pub fn list(&self) -> Duration {
        Duration::from_millis(self.list_ms)
    }

    pub fn detail(&self) -> Duration {
        Duration::from_millis(self.detail_ms)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            list_ms: 10_000,
            detail_ms: 3_000,
            request_secs: 120,
        }
    }
}

/// Enrichment configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Maximum number of detail calls in flight at once (one batch).
    pub batch_size: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self { batch_size: 5 }
    }
}

/// Defaults for incoming catalog queries.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Search text used when the request carries none.
    pub default_text: String,

    /// Page used when the request carries none (or an invalid one).
    pub default_page: u32,

    /// Page size used when the request carries none (or an invalid one).
    pub default_limit: u32,

    /// Value of the `expand` parameter that turns enrichment on.
    pub expand_value: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_text: "the lord of the rings".to_string(),
            default_page: 1,
            default_limit: 10,
            expand_value: "true".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
