//! Upstream catalog client.
//!
//! # Responsibilities
//! - Fetch the complete result set for a text query (no server-side paging)
//! - Fetch the expanded detail record for a single identifier
//! - Enforce the caller-supplied timeout on every call
//! - Distinguish timeouts from other transport/status failures
//!
//! # Design Decisions
//! - No retries at this layer
//! - No mutable state; one client is shared by all concurrent calls

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use url::Url;

use crate::catalog::error::{UpstreamError, UpstreamResult};
use crate::catalog::types::{CatalogItem, CatalogQuery, DetailFields};
use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::resilience::with_deadline;

/// Capability to query the upstream catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch every item matching `query.text`.
    async fn fetch_list(&self, query: &CatalogQuery, timeout: Duration) -> UpstreamResult<Vec<CatalogItem>>;

    /// Fetch the detail fields for one identifier.
    async fn fetch_detail(&self, identifier: &str, timeout: Duration) -> UpstreamResult<DetailFields>;
}

/// reqwest-backed client for an HTTP catalog service.
#[derive(Clone)]
pub struct HttpCatalogClient {
    http: Client,
    config: UpstreamConfig,
    base_url: String,
}

impl HttpCatalogClient {
    /// Create a client from the upstream configuration.
    pub fn new(config: UpstreamConfig) -> UpstreamResult<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            UpstreamError::InvalidRequest(format!("invalid base URL '{}': {}", config.base_url, e))
        })?;

        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            config,
        })
    }

    fn search_url(&self, text: &str) -> UpstreamResult<Url> {
        let mut url = self.endpoint(&self.config.search_path)?;
        url.query_pairs_mut().append_pair(&self.config.query_param, text);
        Ok(url)
    }

    /// Substitute the identifier into `detail_path`. Each `/`-separated part
    /// of the identifier becomes one percent-encoded path segment.
    fn detail_url(&self, identifier: &str) -> UpstreamResult<Url> {
        let (prefix, suffix) = self.config.detail_path.split_once("{id}").ok_or_else(|| {
            UpstreamError::InvalidRequest(format!(
                "detail path '{}' has no {{id}} placeholder",
                self.config.detail_path
            ))
        })?;

        let parts: Vec<&str> = identifier.split('/').filter(|part| !part.is_empty()).collect();
        if parts.is_empty() || parts.iter().any(|part| matches!(*part, "." | "..")) {
            return Err(UpstreamError::InvalidRequest(format!(
                "identifier '{}' is not a valid path",
                identifier
            )));
        }

        // Template text around the placeholder is glued onto the first and
        // last identifier segments, so "/{id}.json" yields ".../OL1W.json".
        let mut segments: Vec<String> = prefix.split('/').map(str::to_string).collect();
        for (index, part) in parts.iter().enumerate() {
            match segments.last_mut() {
                Some(last) if index == 0 => last.push_str(part),
                _ => segments.push(part.to_string()),
            }
        }
        let mut suffix_parts = suffix.split('/');
        if let (Some(last), Some(first)) = (segments.last_mut(), suffix_parts.next()) {
            last.push_str(first);
        }
        segments.extend(suffix_parts.map(str::to_string));

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| UpstreamError::InvalidRequest(format!("invalid base URL '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidRequest(format!("base URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments.iter().filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> UpstreamResult<Url> {
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{}/{}", self.base_url, path))
            .map_err(|e| UpstreamError::InvalidRequest(format!("invalid upstream path '{}': {}", path, e)))
    }

    async fn get_json(&self, url: Url, timeout: Duration) -> UpstreamResult<Value> {
        let request = async {
            let response = self
                .http
                .get(url)
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| classify(e, timeout))?;

            let status = response.status();
            if !status.is_success() {
                return Err(UpstreamError::Status(status.as_u16()));
            }

            response.json::<Value>().await.map_err(|e| classify(e, timeout))
        };

        with_deadline(timeout, request).await
    }

    fn items_from_body(&self, body: Value) -> UpstreamResult<Vec<CatalogItem>> {
        let entries = match body {
            Value::Array(entries) => entries,
            Value::Object(mut object) => match object.remove(&self.config.results_field) {
                Some(Value::Array(entries)) => entries,
                Some(_) => {
                    return Err(UpstreamError::Decode(format!(
                        "field '{}' is not an array",
                        self.config.results_field
                    )))
                }
                None => {
                    return Err(UpstreamError::Decode(format!(
                        "missing results field '{}'",
                        self.config.results_field
                    )))
                }
            },
            _ => return Err(UpstreamError::Decode("expected a JSON object or array".to_string())),
        };

        let mut items = Vec::with_capacity(entries.len());
        for (position, entry) in entries.into_iter().enumerate() {
            match entry {
                Value::Object(fields) => items.push(CatalogItem::from_object(fields, &self.config.id_field)),
                other => {
                    tracing::warn!(position, value = %other, "Skipping non-object catalog entry");
                }
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch_list(&self, query: &CatalogQuery, timeout: Duration) -> UpstreamResult<Vec<CatalogItem>> {
        let start = Instant::now();
        let result: UpstreamResult<Vec<CatalogItem>> = async {
            let url = self.search_url(&query.text)?;
            let body = self.get_json(url, timeout).await?;
            self.items_from_body(body)
        }
        .await;

        metrics::record_upstream_call("list", outcome_label(&result), start);
        if let Ok(items) = &result {
            tracing::debug!(
                text = %query.text,
                items = items.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Fetched catalog list"
            );
        }
        result
    }

    async fn fetch_detail(&self, identifier: &str, timeout: Duration) -> UpstreamResult<DetailFields> {
        let start = Instant::now();
        let result: UpstreamResult<DetailFields> = async {
            let url = self.detail_url(identifier)?;
            match self.get_json(url, timeout).await? {
                Value::Object(fields) => Ok(fields),
                _ => Err(UpstreamError::Decode("detail response is not a JSON object".to_string())),
            }
        }
        .await;

        metrics::record_upstream_call("detail", outcome_label(&result), start);
        result
    }
}

impl std::fmt::Debug for HttpCatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalogClient")
            .field("base_url", &self.base_url)
            .field("search_path", &self.config.search_path)
            .field("detail_path", &self.config.detail_path)
            .finish()
    }
}

fn classify(error: reqwest::Error, timeout: Duration) -> UpstreamError {
    if error.is_timeout() {
        UpstreamError::Timeout(timeout)
    } else if error.is_decode() {
        UpstreamError::Decode(error.to_string())
    } else if let Some(status) = error.status() {
        UpstreamError::Status(status.as_u16())
    } else {
        UpstreamError::Transport(error.to_string())
    }
}

fn outcome_label<T>(result: &UpstreamResult<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    }
}
