//! HTTP access to the storefront's REST services.
//!
//! This crate provides:
//! - `ApiClient` - `get`/`post`/`put`/`delete` against one base URL
//! - `ApiEnvelope` - The `{data, success, message?, total?, page?, limit?}` body
//! - `Transport` - Pluggable request execution (`ReqwestTransport` in production)
//! - `RetryPolicy` - Bounded exponential backoff and `retry_with_backoff`

mod client;
mod error;
mod request;
mod response;
mod retry;
mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::*;
pub use error::*;
pub use request::*;
pub use response::*;
pub use retry::*;
pub use transport::*;

pub use http::Method;
