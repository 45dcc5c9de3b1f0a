//! Upstream and enrichment error definitions.

use std::time::Duration;
use thiserror::Error;

/// Errors raised by an upstream catalog call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The call did not complete within its deadline.
    #[error("upstream timeout after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// The upstream answered with a non-success status.
    #[error("upstream returned status {0}")]
    Status(u16),

    /// Connection or protocol failure.
    #[error("upstream transport error: {0}")]
    Transport(String),

    /// The response body could not be interpreted.
    #[error("upstream response could not be decoded: {0}")]
    Decode(String),

    /// The upstream request could not be built.
    #[error("invalid upstream request: {0}")]
    InvalidRequest(String),
}

impl UpstreamError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Status(_) => "status",
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
            Self::InvalidRequest(_) => "invalid_request",
        }
    }
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Why a single item kept its base form.
#[derive(Debug, Error)]
pub enum EnrichmentFailure {
    /// The item carries no identifier to look up.
    #[error("item has no identifier")]
    MissingIdentifier,

    /// The request deadline left no room for the item's batch.
    #[error("request deadline reached before the item was dispatched")]
    DeadlineReached,

    /// The detail fetch failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl EnrichmentFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingIdentifier => "missing_identifier",
            Self::DeadlineReached => "deadline_reached",
            Self::Upstream(e) => e.kind(),
        }
    }
}
