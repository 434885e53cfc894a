//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate upstream URLs and the bind address
//! - Validate value ranges (timeouts > 0, attempts > 0)
//! - Make sure the server deadline covers the worst-case upstream budget
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::resilience::backoff::backoff_ceiling;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid {field} '{value}': {reason}")]
    UpstreamUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("retries.base_delay_ms ({base}) exceeds retries.max_delay_ms ({max})")]
    BackoffRange { base: u64, max: u64 },

    #[error("retry status {0} is not an HTTP status code")]
    RetryStatus(u16),

    #[error(
        "timeouts.request_secs ({request_secs}s) does not cover the worst-case upstream budget ({budget_secs}s)"
    )]
    RequestDeadline { request_secs: u64, budget_secs: u64 },

    #[error("worst-case upstream budget overflows; lower timeouts.upstream_secs or retries.max_attempts")]
    BudgetOverflow,
}

/// Validate a parsed configuration, collecting every problem.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    for (field, value) in [
        ("upstreams.joke_url", &config.upstreams.joke_url),
        ("upstreams.quote_url", &config.upstreams.quote_url),
    ] {
        if let Err(reason) = check_url(value) {
            errors.push(ValidationError::UpstreamUrl {
                field,
                value: value.clone(),
                reason,
            });
        }
    }

    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.upstream_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::Zero("retries.max_attempts"));
    }
    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::BackoffRange {
            base: config.retries.base_delay_ms,
            max: config.retries.max_delay_ms,
        });
    }
    for &status in &config.retries.retry_statuses {
        if !(100..=599).contains(&status) {
            errors.push(ValidationError::RetryStatus(status));
        }
    }

    match worst_case_budget(config) {
        Some(budget) => {
            if config.timeouts.request_secs > 0 && Duration::from_secs(config.timeouts.request_secs) <= budget {
                errors.push(ValidationError::RequestDeadline {
                    request_secs: config.timeouts.request_secs,
                    budget_secs: budget.as_secs_f64().ceil() as u64,
                });
            }
        }
        None => errors.push(ValidationError::BudgetOverflow),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Longest time the quote path can spend upstream: a fully retried primary
/// call followed by a fully retried certificate fallback.
///
/// `None` when the total does not fit in a `Duration`.
pub fn worst_case_budget(config: &GatewayConfig) -> Option<Duration> {
    let attempts = config.retries.max_attempts;
    let requests = Duration::from_secs(config.timeouts.upstream_secs).checked_mul(attempts)?;
    let backoff = backoff_total(attempts, config.retries.base_delay_ms, config.retries.max_delay_ms)?;
    let per_call = requests.checked_add(backoff)?;
    per_call.checked_mul(2)
}

/// Sum of the backoff ceilings between `attempts` attempts.
fn backoff_total(attempts: u32, base_ms: u64, max_ms: u64) -> Option<Duration> {
    let mut total = Duration::ZERO;
    for attempt in 1..attempts {
        let ceiling = backoff_ceiling(attempt, base_ms, max_ms);
        // Once the ceiling stops growing every remaining wait is the same.
        if ceiling.is_zero() || ceiling.as_millis() == u128::from(max_ms) {
            return total.checked_add(ceiling.checked_mul(attempts - attempt)?);
        }
        total = total.checked_add(ceiling)?;
    }
    Some(total)
}

fn check_url(value: &str) -> Result<(), String> {
    let url = url::Url::parse(value).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}
