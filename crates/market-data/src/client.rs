//! API client.

use std::collections::BTreeMap;
use std::sync::Arc;

use http::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{ApiEnvelope, ApiRequest, FetchError, Params, ReqwestTransport, Transport};

/// Thin wrapper over one REST service.
///
/// Every call forwards to the transport and returns the decoded body. The
/// client adds no retry, no auth header and no timeout; callers that want
/// retries wrap calls in [`retry_with_backoff`](crate::retry_with_backoff).
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    default_headers: BTreeMap<String, String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers)
            .finish()
    }
}

impl ApiClient {
    /// Create a client backed by `reqwest`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(base_url, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client backed by a custom transport.
    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let mut default_headers = BTreeMap::new();
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        Self {
            base_url: base_url.into(),
            transport,
            default_headers,
        }
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// A client for another base URL sharing this client's transport.
    pub fn rebased(&self, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            transport: Arc::clone(&self.transport),
            default_headers: self.default_headers.clone(),
        }
    }

    /// The base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and decode the envelope.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Params,
    ) -> Result<ApiEnvelope<T>, FetchError> {
        let req = self.request(Method::GET, path).with_params(params);
        self.execute(req).await
    }

    /// POST a JSON body to `path` and decode the envelope.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<ApiEnvelope<T>, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::POST, path).json(body)?;
        self.execute(req).await
    }

    /// PUT a JSON body to `path` and decode the envelope.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<ApiEnvelope<T>, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::PUT, path).json(body)?;
        self.execute(req).await
    }

    /// DELETE `path` and decode the envelope.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiEnvelope<T>, FetchError> {
        let req = self.request(Method::DELETE, path);
        self.execute(req).await
    }

    /// GET `path` and decode the body as-is.
    ///
    /// For services that answer with bare JSON instead of an envelope.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Params,
    ) -> Result<T, FetchError> {
        let req = self.request(Method::GET, path).with_params(params);
        self.execute(req).await
    }

    fn request(&self, method: Method, path: &str) -> ApiRequest {
        let mut req = ApiRequest::new(method, &self.base_url, path);
        for (k, v) in &self.default_headers {
            req = req.header(k.clone(), v.clone());
        }
        req
    }

    async fn execute<T: DeserializeOwned>(&self, req: ApiRequest) -> Result<T, FetchError> {
        let method = req.method.clone();
        let url = req.full_url();
        tracing::debug!(%method, %url, "sending request");

        let resp = self.transport.send(req).await.map_err(|e| {
            tracing::debug!(%method, %url, error = %e, "request failed");
            e
        })?;
        let resp = resp.error_for_status(&url)?;
        resp.json()
    }
}
