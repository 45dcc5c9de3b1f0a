//! Catalog search subsystem.
//!
//! # Data Flow
//! ```text
//! CatalogQuery
//!     → client.rs (fetch the full result set, one coarse timeout)
//!     → pagination.rs (compute the visible window, take its items)
//!     → enrichment.rs (optional: per-item detail fetch, bounded batches)
//!     → EnrichedItem list + PaginationMeta
//! ```
//!
//! # Design Decisions
//! - Fetch, paginate and enrich stay separate stages so that upstream paging,
//!   if it ever appears, only touches the client and the windower
//! - List failures fail the request; detail failures degrade to base items
//! - Nothing here outlives a single request

pub mod client;
pub mod enrichment;
pub mod error;
pub mod pagination;
pub mod types;

pub use client::{CatalogClient, HttpCatalogClient};
pub use enrichment::{EnrichmentReport, EnrichmentScheduler, Outcome};
pub use error::{EnrichmentFailure, UpstreamError, UpstreamResult};
pub use pagination::{PaginationMeta, PaginationWindow};
pub use types::{CatalogItem, CatalogQuery, DetailFields, EnrichedItem, Fields, RawCatalogParams};
