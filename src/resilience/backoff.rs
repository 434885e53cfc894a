//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Upper bound of the delay before attempt `attempt + 1`.
///
/// Doubles from `base_ms` on every attempt and never exceeds `max_ms`, so with
/// the defaults the ceilings are 0.5s, 1s, 2s.
pub fn backoff_ceiling(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    Duration::from_millis(delay_ms.min(max_ms))
}

/// Calculate exponential backoff delay with jitter.
///
/// Jitter shaves up to 10% off the ceiling, so the result stays within it.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    let ceiling = backoff_ceiling(attempt, base_ms, max_ms).as_millis() as u64;

    let jitter_range = ceiling / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(ceiling - jitter)
}
