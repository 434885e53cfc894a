//! Humor strategy backed by the random joke API.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::quoting::source::{str_field, QuoteSource};
use crate::quoting::types::{GatewayResponse, Genre, Quotation};
use crate::upstream::{Upstream, UpstreamRequest};

const HUMOR_TAG: &str = "humor";
const DEFAULT_JOKE_AUTHOR: &str = "Joke";

/// Serves `humor`/`fun` requests. Expects `{setup, punchline, type}`.
pub struct JokeSource {
    upstream: Arc<dyn Upstream>,
    url: String,
}

impl JokeSource {
    pub fn new(upstream: Arc<dyn Upstream>, url: impl Into<String>) -> Self {
        Self {
            upstream,
            url: url.into(),
        }
    }
}

fn humor_tags() -> Vec<String> {
    vec![HUMOR_TAG.to_string()]
}

/// Join setup and punchline; the joke category becomes the author.
fn joke_from(data: &Map<String, Value>) -> Option<Quotation> {
    let setup = str_field(data, "setup").unwrap_or_default().trim();
    let punchline = str_field(data, "punchline").unwrap_or_default().trim();

    let text = if !setup.is_empty() && !punchline.is_empty() {
        format!("{setup} {punchline}")
    } else {
        format!("{setup}{punchline}")
    };

    let category = str_field(data, "type")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_JOKE_AUTHOR);

    Quotation::new(text, category)
}

#[async_trait]
impl QuoteSource for JokeSource {
    fn name(&self) -> &'static str {
        "joke"
    }

    async fn fetch(&self, _genre: &Genre) -> GatewayResponse {
        let request = UpstreamRequest::get(self.name(), self.url.as_str());

        let response = match self.upstream.get(&request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "Network error while fetching joke");
                return GatewayResponse::failure(humor_tags(), format!("Network error: {err}"));
            }
        };

        if !response.is_ok() {
            let message = response.error_message();
            tracing::warn!(status = %response.status, error = %message, "Joke API error");
            return GatewayResponse::failure(humor_tags(), format!("Joke API error: {message}"));
        }

        match response.json_object().as_ref().and_then(joke_from) {
            Some(joke) => GatewayResponse::ok(joke, humor_tags(), "OK"),
            None => {
                tracing::warn!(body = %response.body, "Joke API returned empty data");
                GatewayResponse::failure(humor_tags(), "Joke API returned no joke.")
            }
        }
    }
}
