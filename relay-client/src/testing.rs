//! Test transports

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::TriggerClient;
use crate::config::ClientConfig;
use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use relay_core::token::SequentialTokenSource;

/// Replays canned responses in order and records every request
#[derive(Default)]
pub struct StubTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: HttpResponse) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no canned response left for {:?}", request))
    }
}

/// Fails the test if anything reaches the network
pub struct ForbiddenTransport;

#[async_trait]
impl Transport for ForbiddenTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        panic!("simulation mode sent {:?}", request)
    }
}

/// Never answers
pub struct StalledTransport;

#[async_trait]
impl Transport for StalledTransport {
    async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        std::future::pending().await
    }
}

pub fn json_response(status: u16, body: serde_json::Value) -> HttpResponse {
    HttpResponse {
        status,
        location: None,
        body: serde_json::to_vec(&body).unwrap(),
    }
}

/// Client over `transport` whose tokens end in `first_value`, `first_value + 1`, ...
pub fn client_with(
    transport: Arc<StubTransport>,
    first_value: u64,
    result_base: &str,
) -> TriggerClient {
    let config = ClientConfig::new("http://ci.local").with_result_base_url(result_base);
    TriggerClient::with_transport(config, transport)
        .unwrap()
        .with_token_source(Arc::new(SequentialTokenSource::starting_at(first_value)))
}
