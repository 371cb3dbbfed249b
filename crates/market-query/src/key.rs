//! Hierarchical query keys.

use std::fmt;

use serde::Serialize;

/// Key of a query: an ordered list of segments.
///
/// Keys are matched by prefix, so invalidating `["products", "featured"]`
/// also hits `["products", "featured", "6"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// A key with a single segment.
    pub fn root(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// Append a segment.
    pub fn push(mut self, segment: impl fmt::Display) -> Self {
        self.0.push(segment.to_string());
        self
    }

    /// Append a value serialized as JSON.
    pub fn push_json<T: Serialize>(self, value: &T) -> Self {
        let json = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
        self.push(json)
    }

    /// The segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// True when `prefix` is a leading part of this key (or equal to it).
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_match() {
        let featured = QueryKey::root("products").push("featured");
        let with_limit = featured.clone().push(6);
        assert!(with_limit.starts_with(&featured));
        assert!(featured.starts_with(&featured));
        assert!(!featured.starts_with(&with_limit));
        assert!(!QueryKey::root("banners").starts_with(&featured));
    }

    #[test]
    fn test_display() {
        let key = QueryKey::root("products").push("details").push(7);
        assert_eq!(key.to_string(), "[products, details, 7]");
    }

    #[test]
    fn test_push_json() {
        #[derive(Serialize)]
        struct Opts {
            limit: u32,
        }
        let key = QueryKey::root("x").push_json(&Opts { limit: 3 });
        assert_eq!(key.segments()[1], r#"{"limit":3}"#);
    }
}
