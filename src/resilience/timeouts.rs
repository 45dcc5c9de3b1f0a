//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap upstream calls with a deadline
//! - Cancel operations cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Timed-out list fetches return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;
use tokio::time;

use crate::catalog::error::{UpstreamError, UpstreamResult};

/// Run `fut` with a deadline, mapping expiry to [`UpstreamError::Timeout`].
///
/// The future is dropped when the deadline passes.
pub async fn with_deadline<T, F>(deadline: Duration, fut: F) -> UpstreamResult<T>
where
    F: Future<Output = UpstreamResult<T>>,
{
    match time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::Timeout(deadline)),
    }
}
