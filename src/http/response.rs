//! Response bodies and error mapping.
//!
//! # Responsibilities
//! - Shape successful search responses (`results` + `pagination`)
//! - Map upstream list failures to HTTP status codes
//!
//! # Design Decisions
//! - Upstream list timeouts result in 504 Gateway Timeout
//! - Every other upstream list failure results in 500
//! - Error bodies are JSON `{"error": message}` and never carry `results`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::{EnrichedItem, PaginationMeta, UpstreamError};

/// Successful search response.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub results: Vec<EnrichedItem>,
    pub pagination: PaginationMeta,
}

/// Error response payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Failure of a whole search request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The list fetch exceeded its deadline.
    #[error("Request to the catalog service timed out")]
    TimedOut(#[source] UpstreamError),

    /// Any other list fetch failure.
    #[error("Failed to fetch results from the catalog service")]
    Failed(#[source] UpstreamError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::TimedOut(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UpstreamError> for ProxyError {
    fn from(error: UpstreamError) -> Self {
        if error.is_timeout() {
            Self::TimedOut(error)
        } else {
            Self::Failed(error)
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
