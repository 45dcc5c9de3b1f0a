//! Catalog proxy library.
//!
//! Fetches a complete result set from an upstream catalog service that has no
//! server-side paging, paginates it locally, and optionally enriches only the
//! visible page with per-item detail calls in bounded, sequential batches.

pub mod catalog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
