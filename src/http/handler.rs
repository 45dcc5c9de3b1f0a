//! Catalog search handler.
//!
//! # Request Lifecycle
//! ```text
//! query params → CatalogQuery (defaults applied)
//!     → fetch_list (full set, list timeout)   ── timeout ──▶ 504
//!                                             ── error ────▶ 500
//!     → PaginationWindow → visible items
//!     → [expand] EnrichmentScheduler (bounded batches, per-item timeout,
//!                stops dispatching before the request deadline)
//!     → 200 { results, pagination }
//! ```

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::catalog::{
    CatalogClient, CatalogQuery, EnrichedItem, EnrichmentScheduler, PaginationWindow, RawCatalogParams,
};
use crate::config::{ProxyConfig, QueryConfig};
use crate::http::request::RequestIdExt;
use crate::http::response::{CatalogResponse, ProxyError};
use crate::observability::metrics;
use crate::resilience::with_deadline;

/// Time kept back from the request timeout for assembling the response.
const RESPONSE_RESERVE: Duration = Duration::from_millis(250);

/// Orchestrates one catalog search: list fetch, windowing, optional enrichment.
pub struct CatalogHandler {
    client: Arc<dyn CatalogClient>,
    scheduler: EnrichmentScheduler,
    list_timeout: Duration,
    request_budget: Duration,
    query_defaults: QueryConfig,
}

impl CatalogHandler {
    pub fn new(
        client: Arc<dyn CatalogClient>,
        scheduler: EnrichmentScheduler,
        list_timeout: Duration,
        request_budget: Duration,
        query_defaults: QueryConfig,
    ) -> Self {
        Self {
            client,
            scheduler,
            list_timeout,
            request_budget,
            query_defaults,
        }
    }

    /// Build a handler from configuration around an existing client.
    pub fn from_config(config: &ProxyConfig, client: Arc<dyn CatalogClient>) -> Self {
        Self::new(
            client,
            EnrichmentScheduler::new(config.enrichment.batch_size, config.timeouts.detail()),
            config.timeouts.list(),
            config.timeouts.request().saturating_sub(RESPONSE_RESERVE),
            config.query.clone(),
        )
    }

    /// Turn raw query parameters into a query, applying defaults.
    pub fn parse_query(&self, raw: &RawCatalogParams) -> CatalogQuery {
        CatalogQuery::from_params(raw, &self.query_defaults)
    }

    /// Run one search. Once the list fetch succeeds this always returns a page;
    /// enrichment that would overrun `request_budget` is skipped.
    pub async fn handle(&self, query: &CatalogQuery) -> Result<CatalogResponse, ProxyError> {
        let deadline = tokio::time::Instant::now() + self.request_budget;
        let fetch = self.client.fetch_list(query, self.list_timeout);
        let items = match with_deadline(self.list_timeout, fetch).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(text = %query.text, error = %e, kind = e.kind(), "Catalog list fetch failed");
                return Err(e.into());
            }
        };

        let window = PaginationWindow::new(items.len(), query.page, query.limit);
        let visible = window.take(items);

        let results = if query.expand && !visible.is_empty() {
            let (enriched, report) = self
                .scheduler
                .enrich(self.client.as_ref(), visible, Some(deadline))
                .await;
            tracing::debug!(
                batches = report.batches,
                fulfilled = report.fulfilled,
                rejected = report.rejected,
                skipped = report.skipped,
                "Enrichment finished"
            );
            enriched
        } else {
            visible.into_iter().map(EnrichedItem::base).collect()
        };

        tracing::info!(
            text = %query.text,
            page = query.page,
            limit = query.limit,
            expand = query.expand,
            total = window.total_items,
            returned = results.len(),
            "Catalog search served"
        );

        Ok(CatalogResponse {
            results,
            pagination: window.meta(),
        })
    }
}

/// `GET /api/catalog/search`
pub async fn search_catalog(
    State(handler): State<Arc<CatalogHandler>>,
    headers: HeaderMap,
    params: Result<Query<RawCatalogParams>, QueryRejection>,
) -> Response {
    let start = Instant::now();
    let raw = match params {
        Ok(Query(raw)) => raw,
        Err(rejection) => {
            tracing::debug!(
                request_id = %headers.request_id(),
                error = %rejection,
                "Unparseable query string, using defaults"
            );
            RawCatalogParams::default()
        }
    };

    let query = handler.parse_query(&raw);
    tracing::debug!(
        request_id = %headers.request_id(),
        text = %query.text,
        page = query.page,
        limit = query.limit,
        expand = query.expand,
        "Catalog search"
    );

    let response = match handler.handle(&query).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => e.into_response(),
    };

    metrics::record_request(response.status().as_u16(), start);
    response
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
