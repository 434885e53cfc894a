//! Retry logic.
//!
//! # Responsibilities
//! - Determine if an upstream outcome is retryable
//! - Provide the delay before the next attempt
//!
//! # Design Decisions
//! - Only GET is ever retried
//! - Connect failures and timeouts are retryable; certificate failures are not
//! - Status codes are retried only when listed in the policy

use reqwest::{Method, StatusCode};
use std::time::Duration;

use crate::config::RetryConfig;
use crate::resilience::backoff::calculate_backoff;

/// Retry policy applied to every outbound call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
    statuses: Vec<StatusCode>,
}

impl RetryPolicy {
    /// Build a policy from configuration, ignoring status codes that are not valid HTTP.
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
            statuses: config
                .retry_statuses
                .iter()
                .filter_map(|s| StatusCode::from_u16(*s).ok())
                .collect(),
        }
    }

    /// Total attempts allowed for one call, the first one included.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether another attempt may follow attempt number `attempt` (1-based).
    pub fn should_retry(&self, method: &Method, attempt: u32, status: Option<StatusCode>, transient: bool) -> bool {
        attempt < self.max_attempts && is_retryable(method, status, transient, &self.statuses)
    }

    /// Delay to wait after attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.base_delay_ms, self.max_delay_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Decide whether an outcome is worth retrying.
///
/// `status` is the response status when one arrived; `transient` marks a
/// transport failure (connect error, timeout) with no response.
pub fn is_retryable(method: &Method, status: Option<StatusCode>, transient: bool, statuses: &[StatusCode]) -> bool {
    if *method != Method::GET {
        return false;
    }

    match status {
        Some(status) => statuses.contains(&status),
        None => transient,
    }
}
