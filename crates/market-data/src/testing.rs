//! In-memory transport for tests.
//!
//! Responses are scripted per method and path. Each route holds a queue; the
//! last queued outcome repeats once the queue is drained. Unscripted routes
//! answer 404.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::Method;

use crate::{ApiRequest, ApiResponse, FetchError, Transport};

type Outcome = Result<ApiResponse, FetchError>;

#[derive(Default)]
struct Inner {
    routes: HashMap<(Method, String), VecDeque<Outcome>>,
    requests: Vec<ApiRequest>,
}

/// Scripted transport that records every request.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MockTransport {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// This mock as a shared transport.
    pub fn shared(&self) -> Arc<dyn Transport> {
        Arc::new(self.clone())
    }

    /// Queue a 200 JSON response.
    pub fn respond_json(&self, method: Method, path: &str, body: serde_json::Value) {
        self.push(method, path, Ok(ApiResponse::ok_json(&body)));
    }

    /// Queue an empty response with `status`.
    pub fn respond_status(&self, method: Method, path: &str, status: u16) {
        self.push(method, path, Ok(ApiResponse::new(status, Vec::new())));
    }

    /// Queue a transport failure.
    pub fn fail(&self, method: Method, path: &str, message: &str) {
        self.push(method, path, Err(FetchError::Transport(message.to_string())));
    }

    /// Drop every queued outcome for a route.
    pub fn clear_route(&self, method: Method, path: &str) {
        self.lock().routes.remove(&(method, path.to_string()));
    }

    /// All requests sent so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    /// Number of requests sent to a route.
    pub fn calls(&self, method: Method, path: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// The last request sent to a route.
    pub fn last_request(&self, method: Method, path: &str) -> Option<ApiRequest> {
        self.lock()
            .requests
            .iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
            .cloned()
    }

    fn push(&self, method: Method, path: &str, outcome: Outcome) {
        self.lock()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(outcome);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, FetchError> {
        let mut inner = self.lock();
        let key = (request.method.clone(), request.path.clone());
        inner.requests.push(request);

        match inner.routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue
                .pop_front()
                .unwrap_or_else(|| Ok(ApiResponse::new(404, Vec::new()))),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or_else(|| Ok(ApiResponse::new(404, Vec::new()))),
            None => Ok(ApiResponse::new(404, Vec::new())),
        }
    }
}
