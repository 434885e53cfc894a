//! Retrying reqwest client shared by every request.
//!
//! # Responsibilities
//! - Hold the long-lived connection pools (one verified, one unverified)
//! - Apply the per-attempt timeout
//! - Retry GETs on listed statuses and transient failures with backoff
//! - Record upstream metrics

use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::{Duration, Instant};

use crate::config::GatewayConfig;
use crate::observability::metrics;
use crate::resilience::RetryPolicy;
use crate::upstream::{FetchError, TlsMode, Upstream, UpstreamRequest, UpstreamResponse};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Upstream transport over HTTP(S).
#[derive(Clone)]
pub struct HttpUpstream {
    verified: Client,
    unverified: Client,
    timeout: Duration,
    retry: RetryPolicy,
}

impl HttpUpstream {
    /// Create the client pair with the given per-attempt timeout and retry policy.
    pub fn new(timeout: Duration, retry: RetryPolicy, system_proxy: bool) -> Result<Self, reqwest::Error> {
        let builder = || {
            let builder = Client::builder().user_agent(USER_AGENT);
            if system_proxy {
                builder
            } else {
                builder.no_proxy()
            }
        };

        let verified = builder().build()?;
        let unverified = builder().danger_accept_invalid_certs(true).build()?;

        Ok(Self {
            verified,
            unverified,
            timeout,
            retry,
        })
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            Duration::from_secs(config.timeouts.upstream_secs),
            RetryPolicy::from_config(&config.retries),
            config.upstreams.system_proxy,
        )
    }

    fn client(&self, tls: TlsMode) -> &Client {
        match tls {
            TlsMode::Verified => &self.verified,
            TlsMode::Unverified => &self.unverified,
        }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, FetchError> {
        let method = Method::GET;
        let mut attempt = 0;

        if request.tls == TlsMode::Unverified {
            tracing::warn!(source = request.source, url = %request.url, "Sending request without certificate verification");
        }

        loop {
            attempt += 1;
            let start = Instant::now();

            let result = self
                .client(request.tls)
                .request(method.clone(), &request.url)
                .query(&request.query)
                .timeout(self.timeout)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    metrics::record_upstream_attempt(request.source, status.as_str(), start);

                    if self.retry.should_retry(&method, attempt, Some(status), false) {
                        let delay = self.retry.backoff(attempt);
                        tracing::info!(source = request.source, attempt, delay = ?delay, status = %status, "Retrying upstream request");
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    let body = response.text().await.map_err(|e| FetchError::from_reqwest(&e))?;
                    tracing::debug!(source = request.source, attempt, status = %status, "Upstream responded");
                    return Ok(UpstreamResponse::new(status, body));
                }
                Err(e) => {
                    let err = FetchError::from_reqwest(&e);
                    metrics::record_upstream_attempt(request.source, err.kind(), start);
                    tracing::warn!(source = request.source, attempt, error = %err, "Upstream request failed");

                    if self.retry.should_retry(&method, attempt, None, err.is_transient()) {
                        let delay = self.retry.backoff(attempt);
                        tracing::info!(source = request.source, attempt, delay = ?delay, "Retrying after network error");
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    return Err(err);
                }
            }
        }
    }
}
