//! Scripted transport for unit tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::http::request::PreparedRequest;
use crate::http::transport::{ApiResponse, Transport, TransportError};

type Handler = Box<dyn Fn(&PreparedRequest) -> Result<ApiResponse, TransportError> + Send + Sync>;

/// Answers every request with `handler` and records what it saw.
///
/// When gated, requests whose path ends with the gate suffix wait for one
/// `Notify` permit before being answered.
pub(crate) struct FakeTransport {
    handler: Handler,
    requests: Mutex<Vec<PreparedRequest>>,
    gate: Option<(String, Arc<Notify>)>,
}

impl FakeTransport {
    pub fn new(
        handler: impl Fn(&PreparedRequest) -> Result<ApiResponse, TransportError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    pub fn gated(
        suffix: &str,
        gate: Arc<Notify>,
        handler: impl Fn(&PreparedRequest) -> Result<ApiResponse, TransportError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            gate: Some((suffix.to_string(), gate)),
        })
    }

    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path_suffix: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path().ends_with(path_suffix))
            .count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: PreparedRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some((suffix, gate)) = &self.gate {
            if request.path().ends_with(suffix.as_str()) {
                gate.notified().await;
            }
        }

        (self.handler)(&request)
    }
}
