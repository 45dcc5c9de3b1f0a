//! Bounded-concurrency detail enrichment.
//!
//! # Algorithm
//! ```text
//! items ──chunks(batch_size)──▶ batch 1 ──join_all──▶ outcomes 1 ─┐
//!                               batch 2 ──join_all──▶ outcomes 2 ─┼─▶ enriched items (input order)
//!                               ...                               │
//!                               batch n ──join_all──▶ outcomes n ─┘
//! ```
//!
//! # Design Decisions
//! - Batches run strictly one after another; items inside a batch run concurrently,
//!   so at most `batch_size` detail calls are ever in flight per request
//! - Every call carries its own deadline; a slow item only delays its own batch
//!   up to that deadline and never cancels its siblings
//! - Failures are absorbed per item: the base item is kept unchanged
//! - An optional deadline bounds the whole run: a batch only starts if it can
//!   finish before the deadline, otherwise the remaining items keep their base form
//! - No shared mutable state between tasks; each writes only its own outcome slot

use futures_util::future::join_all;
use std::time::Duration;
use tokio::time::Instant;

use crate::catalog::client::CatalogClient;
use crate::catalog::error::EnrichmentFailure;
use crate::catalog::types::{CatalogItem, DetailFields, EnrichedItem};
use crate::observability::metrics;
use crate::resilience::with_deadline;

/// Default number of detail calls issued concurrently.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Default deadline for a single detail call.
pub const DEFAULT_ITEM_TIMEOUT: Duration = Duration::from_secs(3);

/// Terminal result of one enrichment task.
#[derive(Debug)]
pub enum Outcome {
    Fulfilled(DetailFields),
    Rejected(EnrichmentFailure),
}

impl Outcome {
    /// Combine the outcome with its source item, falling back to the base form on rejection.
    pub fn into_item(self, item: CatalogItem) -> EnrichedItem {
        match self {
            Outcome::Fulfilled(details) => EnrichedItem::enriched(item, details),
            Outcome::Rejected(_) => EnrichedItem::base(item),
        }
    }
}

/// Counts of how a scheduler run went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub batches: usize,
    pub fulfilled: usize,
    pub rejected: usize,
    /// Items never dispatched because the deadline left no room for their batch.
    pub skipped: usize,
}

/// Runs detail fetches for a window of items in sequential, bounded batches.
#[derive(Debug, Clone, Copy)]
pub struct EnrichmentScheduler {
    batch_size: usize,
    item_timeout: Duration,
}

impl Default for EnrichmentScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE, DEFAULT_ITEM_TIMEOUT)
    }
}

impl EnrichmentScheduler {
    /// Create a scheduler. A `batch_size` of zero is treated as one.
    pub fn new(batch_size: usize, item_timeout: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            item_timeout,
        }
    }

    /// Enrich `items`, preserving their order. Never fails.
    ///
    /// With a `deadline`, a batch is dispatched only while a full item timeout
    /// still fits before it; the rest fall back to their base form untouched.
    pub async fn enrich(
        &self,
        client: &dyn CatalogClient,
        items: Vec<CatalogItem>,
        deadline: Option<Instant>,
    ) -> (Vec<EnrichedItem>, EnrichmentReport) {
        let mut report = EnrichmentReport::default();
        let mut enriched = Vec::with_capacity(items.len());
        let mut remaining = items.into_iter().peekable();

        while remaining.peek().is_some() {
            if deadline.is_some_and(|deadline| Instant::now() + self.item_timeout > deadline) {
                let skipped: Vec<CatalogItem> = remaining.by_ref().collect();
                report.skipped = skipped.len();
                metrics::record_enrichment_failure(EnrichmentFailure::DeadlineReached.kind());
                tracing::warn!(
                    skipped = report.skipped,
                    completed_batches = report.batches,
                    "Request deadline reached, returning remaining items unenriched"
                );
                enriched.extend(skipped.into_iter().map(EnrichedItem::base));
                break;
            }

            let batch: Vec<CatalogItem> = remaining.by_ref().take(self.batch_size).collect();
            report.batches += 1;

            let outcomes = self.run_batch(client, &batch).await;

            for (item, outcome) in batch.into_iter().zip(outcomes) {
                match &outcome {
                    Outcome::Fulfilled(_) => report.fulfilled += 1,
                    Outcome::Rejected(reason) => {
                        report.rejected += 1;
                        metrics::record_enrichment_failure(reason.kind());
                        tracing::debug!(
                            identifier = %item.identifier,
                            reason = %reason,
                            "Enrichment failed, keeping base item"
                        );
                    }
                }
                enriched.push(outcome.into_item(item));
            }
        }

        metrics::record_enrichment(report.fulfilled, report.rejected + report.skipped);
        (enriched, report)
    }

    /// Dispatch one task per item and wait for all of them to settle.
    async fn run_batch(&self, client: &dyn CatalogClient, batch: &[CatalogItem]) -> Vec<Outcome> {
        let tasks = batch.iter().map(|item| self.enrich_one(client, &item.identifier));
        join_all(tasks).await
    }

    async fn enrich_one(&self, client: &dyn CatalogClient, identifier: &str) -> Outcome {
        if identifier.is_empty() {
            return Outcome::Rejected(EnrichmentFailure::MissingIdentifier);
        }

        let fetch = client.fetch_detail(identifier, self.item_timeout);
        match with_deadline(self.item_timeout, fetch).await {
            Ok(details) => Outcome::Fulfilled(details),
            Err(e) => Outcome::Rejected(e.into()),
        }
    }
}
