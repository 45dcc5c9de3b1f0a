//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream catalog:
//!     → timeouts.rs (enforce per-call deadline)
//!     → On list failure: whole request fails (504 on timeout, 500 otherwise)
//!     → On detail failure: item falls back to its base form
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries; each request is independent

pub mod timeouts;

pub use timeouts::with_deadline;
