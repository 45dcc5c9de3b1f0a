//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener
//! - Serve until the shutdown signal fires

use axum::body::Body;
use axum::http::Request;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::catalog::{CatalogClient, HttpCatalogClient, UpstreamResult};
use crate::config::ProxyConfig;
use crate::http::handler::{health, search_catalog, CatalogHandler};
use crate::http::request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};

/// Path of the catalog search endpoint.
pub const SEARCH_PATH: &str = "/api/catalog/search";

/// HTTP server for the catalog proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server talking to the configured upstream catalog.
    pub fn new(config: ProxyConfig) -> UpstreamResult<Self> {
        let client = HttpCatalogClient::new(config.upstream.clone())?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Create a server around an existing catalog client.
    pub fn with_client(config: ProxyConfig, client: Arc<dyn CatalogClient>) -> Self {
        let handler = Arc::new(CatalogHandler::from_config(&config, client));
        let router = Self::build_router(&config, handler);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, handler: Arc<CatalogHandler>) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request.headers().request_id(),
                )
            }))
            .layer(TimeoutLayer::new(config.timeouts.request()));

        Router::new()
            .route(SEARCH_PATH, get(search_catalog))
            .with_state(handler)
            .route("/health", get(health))
            .layer(middleware)
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
