//! The capability every upstream strategy provides.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::quoting::types::{GatewayResponse, Genre};

/// Fetch one quotation for a genre and normalize it into a [`GatewayResponse`].
///
/// Implementations never fail: every upstream problem is reported through
/// `success = false` and a message.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Label for logs and metrics.
    fn name(&self) -> &'static str;

    async fn fetch(&self, genre: &Genre) -> GatewayResponse;
}

/// String field of a JSON object, if present and a string.
pub(crate) fn str_field<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str)
}
