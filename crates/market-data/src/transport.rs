//! Request execution.

use async_trait::async_trait;

use crate::{ApiRequest, ApiResponse, FetchError};

/// Executes requests built by [`ApiClient`](crate::ApiClient).
///
/// Implementations return any response the server produced, including
/// non-2xx ones; status handling happens in the client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, FetchError>;
}

/// Transport backed by a `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, FetchError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .query(request.params.pairs());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| {
            if e.is_builder() {
                FetchError::InvalidUrl(request.url.clone())
            } else {
                FetchError::Transport(e.to_string())
            }
        })?;

        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(ApiResponse::new(status, body.to_vec()))
    }
}
