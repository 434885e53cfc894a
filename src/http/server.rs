//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Build the shared upstream client once and inject it into handlers
//! - Bind server to listener and shut down gracefully

use axum::{
    body::Body,
    http::Request,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::http::quote;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::quoting::QuoteGateway;
use crate::upstream::{HttpUpstream, Upstream};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: QuoteGateway,
}

/// HTTP server for the quote gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server talking to the real upstream APIs.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let upstream = Arc::new(HttpUpstream::from_config(&config)?);
        Ok(Self::with_upstream(config, upstream))
    }

    /// Create a server over a caller-provided upstream transport.
    pub fn with_upstream(config: GatewayConfig, upstream: Arc<dyn Upstream>) -> Self {
        let gateway = QuoteGateway::from_config(upstream, &config.upstreams);
        Self::with_gateway(config, gateway)
    }

    pub fn with_gateway(config: GatewayConfig, gateway: QuoteGateway) -> Self {
        let router = Self::build_router(&config, AppState { gateway });
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(quote::home))
            .route("/get_quote", get(quote::get_quote))
            .route("/health", get(quote::health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request),
                )
            }))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// The configured router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::X_REQUEST_ID;
    use crate::quoting::GatewayResponse;
    use crate::upstream::stub::{reply, StubUpstream};
    use crate::upstream::{FetchError, TlsMode};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn server(stub: StubUpstream) -> (Router, Arc<StubUpstream>) {
        let stub = Arc::new(stub);
        let server = HttpServer::with_upstream(GatewayConfig::default(), stub.clone());
        (server.router(), stub)
    }

    async fn call(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    #[tokio::test]
    async fn test_failures_are_still_200() {
        let (router, _) = server(StubUpstream::fixed(500, r#"{"message":"server error"}"#));
        let (status, _, body) = call(router, "/get_quote?genre=love").await;

        assert_eq!(status, StatusCode::OK);
        let body: GatewayResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, GatewayResponse::failure(vec![], "Quotable API error: server error"));
    }

    #[tokio::test]
    async fn test_certificate_fallback_through_router() {
        let (router, stub) = server(StubUpstream::new(|request| match request.tls {
            TlsMode::Verified => Err(FetchError::Certificate("certificate verify failed".into())),
            TlsMode::Unverified => Ok(reply(200, r#"{"content":"X","author":"Y","tags":[]}"#)),
        }));
        let (status, _, body) = call(router, "/get_quote").await;

        assert_eq!(status, StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "OK (ssl verification bypassed; update certs to fix)");
        assert_eq!(stub.calls()[0].query, vec![("tags".to_string(), "inspirational".to_string())]);
    }

    #[tokio::test]
    async fn test_genre_query_is_normalized() {
        let (router, stub) = server(StubUpstream::fixed(200, r#"{"setup":"a","punchline":"b","type":"pun"}"#));
        let (_, _, body) = call(router, "/get_quote?genre=%20FUN%20").await;

        let body: GatewayResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.quote.as_deref(), Some("a b"));
        assert_eq!(stub.calls()[0].url, GatewayConfig::default().upstreams.joke_url);
    }

    #[tokio::test]
    async fn test_request_id_is_generated_and_echoed() {
        let (router, _) = server(StubUpstream::fixed(200, "{}"));
        let (_, headers, _) = call(router.clone(), "/health").await;
        assert!(headers.get(X_REQUEST_ID).is_some());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(X_REQUEST_ID, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[X_REQUEST_ID], "abc-123");
    }

    #[tokio::test]
    async fn test_home_page() {
        let (router, stub) = server(StubUpstream::fixed(200, "{}"));
        let (status, headers, body) = call(router, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(headers[axum::http::header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        assert!(String::from_utf8(body).unwrap().contains("/get_quote"));
        assert!(stub.calls().is_empty());
    }
}
