//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, batch size > 0)
//! - Check upstream endpoints are usable URLs and templates
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("upstream.base_url '{url}' is invalid: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("upstream.detail_path '{0}' must contain the {{id}} placeholder")]
    MissingIdPlaceholder(String),

    #[error("upstream.{0} must not be empty")]
    EmptyUpstreamField(&'static str),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("timeouts.request_secs must exceed timeouts.list_ms")]
    RequestTimeoutTooShort,

    #[error("enrichment.batch_size must be greater than zero")]
    ZeroBatchSize,

    #[error("query.{0} must be greater than zero")]
    ZeroQueryDefault(&'static str),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let upstream = &config.upstream;
    match Url::parse(&upstream.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::InvalidBaseUrl {
            url: upstream.base_url.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidBaseUrl {
            url: upstream.base_url.clone(),
            reason: e.to_string(),
        }),
    }
    if !upstream.detail_path.contains("{id}") {
        errors.push(ValidationError::MissingIdPlaceholder(
            upstream.detail_path.clone(),
        ));
    }
    for (name, value) in [
        ("search_path", &upstream.search_path),
        ("query_param", &upstream.query_param),
        ("id_field", &upstream.id_field),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::EmptyUpstreamField(name));
        }
    }

    let timeouts = &config.timeouts;
    if timeouts.list_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("list_ms"));
    }
    if timeouts.detail_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("detail_ms"));
    }
    if timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    } else if timeouts.request() <= timeouts.list() {
        errors.push(ValidationError::RequestTimeoutTooShort);
    }

    if config.enrichment.batch_size == 0 {
        errors.push(ValidationError::ZeroBatchSize);
    }

    if config.query.default_page == 0 {
        errors.push(ValidationError::ZeroQueryDefault("default_page"));
    }
    if config.query.default_limit == 0 {
        errors.push(ValidationError::ZeroQueryDefault("default_limit"));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
