//! Genre dispatch between the quote strategies.

use std::sync::Arc;
use tracing::Instrument;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::quoting::joke::JokeSource;
use crate::quoting::quotable::QuotableSource;
use crate::quoting::source::QuoteSource;
use crate::quoting::types::{GatewayResponse, Genre};
use crate::upstream::Upstream;

/// Routes humor genres to the joke strategy and everything else to quotes.
#[derive(Clone)]
pub struct QuoteGateway {
    jokes: Arc<dyn QuoteSource>,
    quotes: Arc<dyn QuoteSource>,
}

impl QuoteGateway {
    pub fn new(jokes: Arc<dyn QuoteSource>, quotes: Arc<dyn QuoteSource>) -> Self {
        Self { jokes, quotes }
    }

    /// Wire both strategies to one shared upstream client.
    pub fn from_config(upstream: Arc<dyn Upstream>, config: &UpstreamConfig) -> Self {
        Self::new(
            Arc::new(JokeSource::new(upstream.clone(), config.joke_url.as_str())),
            Arc::new(QuotableSource::new(upstream, config.quote_url.as_str())),
        )
    }

    /// Strategy responsible for a genre.
    pub fn source_for(&self, genre: &Genre) -> &dyn QuoteSource {
        if genre.is_humor() {
            self.jokes.as_ref()
        } else {
            self.quotes.as_ref()
        }
    }

    /// Fetch one quote or joke for the genre. Never fails.
    pub async fn get_quote(&self, genre: &Genre) -> GatewayResponse {
        let source = self.source_for(genre);
        let span = tracing::info_span!("get_quote", source = source.name(), genre = %genre);

        let response = source.fetch(genre).instrument(span).await;
        metrics::record_response(source.name(), response.success);
        response
    }
}
