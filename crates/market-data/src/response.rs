//! HTTP response handling.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::FetchError;

/// A raw HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The response body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Create a new response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Create a 200 response carrying `value` as JSON.
    pub fn ok_json(value: &serde_json::Value) -> Self {
        Self::new(200, value.to_string())
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::Decode(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    pub fn error_for_status(self, url: &str) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            let message = self
                .text()
                .ok()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| status_reason(self.status).to_string());
            Err(FetchError::Http {
                status: self.status,
                url: url.to_string(),
                message,
            })
        }
    }
}

fn status_reason(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status")
}

/// Envelope returned by the main REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Payload. Absent on some error responses.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Server-reported success flag.
    #[serde(default)]
    pub success: bool,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Total number of matching items (paged endpoints).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Current page (paged endpoints).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size (paged endpoints).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl<T> ApiEnvelope<T> {
    /// Create a successful envelope around `data`.
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            success: true,
            message: None,
            total: None,
            page: None,
            limit: None,
        }
    }

    /// Take the payload, or `T::default()` when the server sent none.
    pub fn into_data(self) -> T
    where
        T: Default,
    {
        self.data.unwrap_or_default()
    }

    /// Take the payload, failing when the server sent none.
    pub fn require_data(self) -> Result<T, FetchError> {
        self.data.ok_or_else(|| {
            FetchError::Decode(
                self.message
                    .unwrap_or_else(|| "response has no data".to_string()),
            )
        })
    }

    /// Map the payload, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiEnvelope<U> {
        ApiEnvelope {
            data: self.data.map(f),
            success: self.success,
            message: self.message,
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}
