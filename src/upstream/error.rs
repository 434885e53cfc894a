//! Transport-level failures of upstream calls.
//!
//! HTTP error statuses are not errors at this layer: they come back as an
//! [`UpstreamResponse`](super::UpstreamResponse) and the caller decides what
//! they mean.

use std::error::Error as StdError;
use thiserror::Error;

/// Why an upstream call produced no response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server certificate could not be validated.
    #[error("{0}")]
    Certificate(String),

    /// The attempt ran past its deadline.
    #[error("{0}")]
    Timeout(String),

    /// No connection could be established (DNS, refused, reset).
    #[error("{0}")]
    Connect(String),

    /// Anything else: malformed URL, broken body, protocol errors.
    #[error("{0}")]
    Transport(String),
}

impl FetchError {
    /// Classify a reqwest error, keeping its full description.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        let description = describe(err);

        if is_certificate_error(err) {
            FetchError::Certificate(description)
        } else if err.is_timeout() {
            FetchError::Timeout(description)
        } else if err.is_connect() {
            FetchError::Connect(description)
        } else {
            FetchError::Transport(description)
        }
    }

    /// Failures worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Timeout(_) | FetchError::Connect(_))
    }

    pub fn is_certificate(&self) -> bool {
        matches!(self, FetchError::Certificate(_))
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Certificate(_) => "certificate",
            FetchError::Timeout(_) => "timeout",
            FetchError::Connect(_) => "connect",
            FetchError::Transport(_) => "transport",
        }
    }
}

/// Render an error together with its source chain.
///
/// Sources whose text is already part of the message are skipped, since
/// several layers of the HTTP stack repeat their inner error.
pub fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut description = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !description.contains(&text) {
            description.push_str(": ");
            description.push_str(&text);
        }
        source = cause.source();
    }

    description
}

const CERTIFICATE_MARKERS: &[&str] = &[
    "certificate",
    "cert verify",
    "self signed",
    "self-signed",
    "unknown issuer",
    "unknownissuer",
];

/// Whether a nested source of `err` reports a failed certificate validation.
///
/// Both TLS backends reqwest can be built with only surface this in the
/// message of a nested source, so the chain is inspected textually. The
/// top-level message is skipped: it carries the request URL, query included.
pub fn is_certificate_error(err: &(dyn StdError + 'static)) -> bool {
    let mut current = err.source();

    while let Some(e) = current {
        let text = e.to_string().to_lowercase();
        if CERTIFICATE_MARKERS.iter().any(|marker| text.contains(marker)) {
            return true;
        }
        current = e.source();
    }

    false
}
