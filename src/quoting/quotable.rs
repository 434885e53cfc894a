//! Quote strategy backed by the Quotable API.
//!
//! Sends the genre as the `tags` query parameter. When the certificate of the
//! API cannot be validated, repeats the request once without validation and
//! says so in the response message.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::quoting::source::{str_field, QuoteSource};
use crate::quoting::types::{GatewayResponse, Genre, Quotation};
use crate::upstream::{FetchError, Upstream, UpstreamRequest, UpstreamResponse};

const BYPASS_MESSAGE: &str = "OK (ssl verification bypassed; update certs to fix)";

/// Serves every genre other than humor. Expects `{content, author, tags}`.
pub struct QuotableSource {
    upstream: Arc<dyn Upstream>,
    url: String,
}

/// Parsed body: the quotation when complete, and whatever tags came with it.
fn quote_from(data: &Map<String, Value>) -> (Option<Quotation>, Vec<String>) {
    let tags = data
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| tags.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default();

    let quotation = match (str_field(data, "content"), str_field(data, "author")) {
        (Some(content), Some(author)) => Quotation::new(content, author),
        _ => None,
    };

    (quotation, tags)
}

impl QuotableSource {
    pub fn new(upstream: Arc<dyn Upstream>, url: impl Into<String>) -> Self {
        Self {
            upstream,
            url: url.into(),
        }
    }

    fn from_primary(response: UpstreamResponse) -> GatewayResponse {
        if !response.is_ok() {
            let message = response.error_message();
            tracing::warn!(status = %response.status, error = %message, "Quotable API error");
            return GatewayResponse::failure(Vec::new(), format!("Quotable API error: {message}"));
        }

        let (quotation, tags) = match response.json_object() {
            Some(data) => quote_from(&data),
            None => (None, Vec::new()),
        };

        match quotation {
            Some(quotation) => GatewayResponse::ok(quotation, tags, "OK"),
            None => {
                tracing::warn!(body = %response.body, "Quotable API returned incomplete data");
                GatewayResponse::failure(tags, "Quotable returned incomplete data.")
            }
        }
    }

    async fn fallback(&self, request: &UpstreamRequest) -> GatewayResponse {
        let response = match self.upstream.get(&request.unverified()).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "Fallback request failed after SSL error");
                return GatewayResponse::failure(
                    Vec::new(),
                    format!("SSL verification failed and fallback request failed: {err}"),
                );
            }
        };

        if response.is_ok() {
            if let Some((Some(quotation), tags)) = response.json_object().as_ref().map(quote_from) {
                return GatewayResponse::ok(quotation, tags, BYPASS_MESSAGE);
            }
        }

        let message = response.error_message();
        tracing::warn!(status = %response.status, error = %message, "SSL fallback did not return a quote");
        GatewayResponse::failure(
            Vec::new(),
            format!("SSL verification failed and fallback failed: {message}"),
        )
    }
}

#[async_trait]
impl QuoteSource for QuotableSource {
    fn name(&self) -> &'static str {
        "quotable"
    }

    async fn fetch(&self, genre: &Genre) -> GatewayResponse {
        let request = UpstreamRequest::get(self.name(), self.url.as_str()).query("tags", genre.as_str());

        match self.upstream.get(&request).await {
            Ok(response) => Self::from_primary(response),
            Err(FetchError::Certificate(reason)) => {
                tracing::warn!(error = %reason, "SSL verification failed. Attempting fallback without verification.");
                self.fallback(&request).await
            }
            Err(err) => {
                tracing::error!(error = %err, "Network error while fetching quote");
                GatewayResponse::failure(Vec::new(), format!("Network error: {err}"))
            }
        }
    }
}
