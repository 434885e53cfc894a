//! Scripted in-memory upstream for unit tests.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Mutex;

use crate::upstream::{FetchError, Upstream, UpstreamRequest, UpstreamResponse};

type Responder = Box<dyn Fn(&UpstreamRequest) -> Result<UpstreamResponse, FetchError> + Send + Sync>;

/// Answers every request through a closure and records what was asked.
pub(crate) struct StubUpstream {
    responder: Responder,
    calls: Mutex<Vec<UpstreamRequest>>,
}

impl StubUpstream {
    pub(crate) fn new<F>(responder: F) -> Self
    where
        F: Fn(&UpstreamRequest) -> Result<UpstreamResponse, FetchError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always reply with the same status and body.
    pub(crate) fn fixed(status: u16, body: &'static str) -> Self {
        Self::new(move |_| Ok(reply(status, body)))
    }

    pub(crate) fn calls(&self) -> Vec<UpstreamRequest> {
        self.calls.lock().unwrap().clone()
    }
}

pub(crate) fn reply(status: u16, body: &str) -> UpstreamResponse {
    UpstreamResponse::new(StatusCode::from_u16(status).unwrap(), body)
}

#[async_trait]
impl Upstream for StubUpstream {
    async fn get(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, FetchError> {
        self.calls.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }
}
