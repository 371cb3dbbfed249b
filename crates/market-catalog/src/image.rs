//! Image path resolution.
//!
//! Services return image paths relative to some asset host, and different
//! pages join them differently.

/// How a relative image path becomes a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageBase {
    /// `{base}{path}`
    Prefix(String),
    /// `{base}/uploads/{path}`
    Uploads(String),
}

impl ImageBase {
    /// Resolve a path. Absolute URLs pass through unchanged.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        match self {
            Self::Prefix(base) => format!("{}{}", base, path),
            Self::Uploads(base) => format!(
                "{}/uploads/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
        }
    }

    /// Resolve the first image of a list, if any.
    pub fn resolve_first(&self, images: &[String]) -> Option<String> {
        images.first().map(|p| self.resolve(p))
    }
}
