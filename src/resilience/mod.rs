//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream call:
//!     → per-attempt timeout (reqwest request timeout)
//!     → On failure: retries.rs (check if retryable, retry with backoff)
//!     → backoff.rs (exponential delay, jitter under the ceiling)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Retries only for GET
//! - Retry state lives on the stack of a single call, never across requests

pub mod backoff;
pub mod retries;

pub use retries::RetryPolicy;
