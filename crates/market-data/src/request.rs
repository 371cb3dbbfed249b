//! Outgoing requests.

use std::collections::BTreeMap;
use std::fmt::Display;

use http::Method;
use serde::Serialize;

use crate::FetchError;

/// Query-string parameters, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Create an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    pub fn insert(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.0.push((key.into(), value.to_string()));
        self
    }

    /// Add a parameter when `value` is present.
    pub fn insert_opt<V: Display>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.insert(key, v),
            None => self,
        }
    }

    /// Look up a parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// True when no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parameters as key/value pairs.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

/// A request handed to a [`Transport`](crate::Transport).
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL without the query string.
    pub url: String,
    /// Path relative to the client's base URL.
    pub path: String,
    /// Query parameters.
    pub params: Params,
    /// Headers.
    pub headers: BTreeMap<String, String>,
    /// JSON body.
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Create a request for `path` under `base_url`.
    pub fn new(method: Method, base_url: &str, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            url: join_url(base_url, &path),
            method,
            path,
            params: Params::new(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Set the query parameters.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Add a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, FetchError> {
        self.body = Some(serde_json::to_value(value)?);
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    /// URL including the encoded query string, for logs and errors.
    ///
    /// A URL that does not parse is returned as is, without parameters.
    pub fn full_url(&self) -> String {
        if self.params.is_empty() {
            return self.url.clone();
        }
        reqwest::Url::parse_with_params(&self.url, self.params.pairs())
            .map(String::from)
            .unwrap_or_else(|_| self.url.clone())
    }
}

/// Join a base URL and a path without doubling or dropping the slash.
pub fn join_url(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) if !path.is_empty() => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://a.io", "/banners"), "https://a.io/banners");
        assert_eq!(join_url("https://a.io/", "/banners"), "https://a.io/banners");
        assert_eq!(join_url("https://a.io", "banners"), "https://a.io/banners");
        assert_eq!(join_url("https://a.io/", ""), "https://a.io/");
    }

    #[test]
    fn test_params() {
        let params = Params::new()
            .insert("include_inactive", false)
            .insert("limit", 6)
            .insert_opt("status", None::<&str>);

        assert_eq!(params.get("include_inactive"), Some("false"));
        assert_eq!(params.get("limit"), Some("6"));
        assert_eq!(params.get("status"), None);
        assert_eq!(params.pairs().len(), 2);
    }

    #[test]
    fn test_full_url_encodes_query() {
        let req = ApiRequest::new(Method::GET, "https://a.io", "/products/search")
            .with_params(Params::new().insert("q", "red bike & helmet"));
        assert_eq!(
            req.full_url(),
            "https://a.io/products/search?q=red+bike+%26+helmet"
        );
    }

    #[test]
    fn test_full_url_unparsable_base_drops_query() {
        let req = ApiRequest::new(Method::GET, "not a url", "/banners")
            .with_params(Params::new().insert("limit", 6));
        assert_eq!(req.full_url(), "not a url/banners");
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let req = ApiRequest::new(Method::POST, "https://a.io", "/user/favorites")
            .json(&serde_json::json!({"productId": 3}))
            .unwrap();
        assert_eq!(
            req.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(req.body, Some(serde_json::json!({"productId": 3})));
    }
}
