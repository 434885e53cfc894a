//! Outbound calls to third-party content APIs.
//!
//! # Data Flow
//! ```text
//! QuoteSource (quoting/)
//!     → UpstreamRequest (url, query, tls mode)
//!     → Upstream::get (client.rs: timeout + retry policy)
//!     → UpstreamResponse { status, body } | FetchError
//! ```
//!
//! # Design Decisions
//! - The transport is a trait object injected into the handler, so tests can
//!   script responses without a network
//! - Certificate verification can only be disabled per request, and only the
//!   dedicated fallback client honours it

pub mod client;
pub mod error;
#[cfg(test)]
pub(crate) mod stub;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Map, Value};

pub use client::HttpUpstream;
pub use error::FetchError;

/// Certificate handling for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// Normal certificate validation.
    Verified,
    /// Validation disabled. Only used for the one-shot fallback after a
    /// certificate failure.
    Unverified,
}

/// A GET request to an upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    /// Label used in logs and metrics ("joke", "quotable").
    pub source: &'static str,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub tls: TlsMode,
}

impl UpstreamRequest {
    pub fn get(source: &'static str, url: impl Into<String>) -> Self {
        Self {
            source,
            url: url.into(),
            query: Vec::new(),
            tls: TlsMode::Verified,
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Same request with certificate validation turned off.
    pub fn unverified(&self) -> Self {
        Self {
            tls: TlsMode::Unverified,
            ..self.clone()
        }
    }
}

/// Status and raw body of an upstream reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Body as a JSON object, or `None` when it is anything else.
    pub fn json_object(&self) -> Option<Map<String, Value>> {
        match serde_json::from_str(&self.body) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// Best description of an upstream failure.
    ///
    /// Uses the `message` field of a JSON object body when there is one and
    /// the raw body text otherwise.
    pub fn error_message(&self) -> String {
        match self.json_object().and_then(|mut body| body.remove("message")) {
            Some(Value::String(message)) => message,
            Some(message) => message.to_string(),
            None => self.body.clone(),
        }
    }
}

/// Capability to perform GET requests against upstream APIs.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn get(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, FetchError>;
}
