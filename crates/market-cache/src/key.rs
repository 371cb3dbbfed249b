//! Cache key composition.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Entity family a cache entry belongs to.
///
/// Invalidation works on whole families: a banner mutation drops every
/// hero-slide entry regardless of the options it was read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheFamily {
    /// Hero and promotional banners.
    HeroSlides,
    /// Storefront categories.
    Categories,
}

impl CacheFamily {
    /// Stable name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HeroSlides => "hero-slides",
            Self::Categories => "categories",
        }
    }
}

impl fmt::Display for CacheFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    family: CacheFamily,
    params: String,
}

impl CacheKey {
    /// Create a key from a family and already-serialized options.
    pub fn new(family: CacheFamily, params: impl Into<String>) -> Self {
        Self {
            family,
            params: params.into(),
        }
    }

    /// Create a key by serializing `options` to JSON.
    ///
    /// Equal options always serialize identically because struct fields keep
    /// declaration order.
    pub fn from_options<O: Serialize>(family: CacheFamily, options: &O) -> Self {
        let params = serde_json::to_string(options).unwrap_or_else(|_| "{}".to_string());
        Self::new(family, params)
    }

    /// The entity family.
    pub fn family(&self) -> CacheFamily {
        self.family
    }

    /// The serialized options.
    pub fn params(&self) -> &str {
        &self.params
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.family, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Opts {
        include_inactive: Option<bool>,
    }

    #[test]
    fn test_from_options_is_deterministic() {
        let a = CacheKey::from_options(CacheFamily::HeroSlides, &Opts { include_inactive: Some(true) });
        let b = CacheKey::from_options(CacheFamily::HeroSlides, &Opts { include_inactive: Some(true) });
        assert_eq!(a, b);
        assert_eq!(a.to_string(), r#"hero-slides-{"include_inactive":true}"#);
    }

    #[test]
    fn test_family_distinguishes_equal_params() {
        let slides = CacheKey::new(CacheFamily::HeroSlides, "{}");
        let categories = CacheKey::new(CacheFamily::Categories, "{}");
        assert_ne!(slides, categories);
        assert_eq!(categories.family(), CacheFamily::Categories);
    }
}
