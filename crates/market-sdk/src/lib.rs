//! # Marketplace storefront SDK
//!
//! The fetch, cache and render pipeline of the storefront behind one
//! dependency.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use market_sdk::prelude::*;
//!
//! let config = StorefrontConfig::from_env();
//! config.validate().into_result()?;
//! LoggingSetup::from_config(&config.logging)?.init()?;
//!
//! let queries = StorefrontQueries::from_services(Storefront::from_config(&config));
//! let page = HomePage::load(&queries, config_images(&config)).await;
//! println!("{}", render_or_fallback(|| page.render()));
//! ```
//!
//! ## Layers
//!
//! - `market_data` - HTTP transport, envelopes and retry with backoff
//! - `market_cache` - TTL cache behind the banner service
//! - `market_services` - One service per remote API
//! - `market_query` - Keyed query cache with stale times and mutations
//! - `market_views` - HTML renderers and page composition
//!
//! ## Crate Features
//!
//! - `testing` - Expose `market_data::testing::MockTransport`

pub mod prelude;

pub use market_cache;
pub use market_catalog;
pub use market_core;
pub use market_data;
pub use market_observability;
pub use market_query;
pub use market_services;
pub use market_views;

pub use market_core::{ConfigError, StorefrontConfig};
pub use market_observability::{LogFormat, LoggingSetup};
pub use market_query::{QueryClient, StorefrontQueries};
pub use market_services::{ServiceError, Storefront};
pub use market_views::{CategoryListingsPage, HomePage, ListingDetailPage};

use market_catalog::ImageBase;

/// Image base for banners served by the main API.
pub fn config_images(config: &StorefrontConfig) -> ImageBase {
    ImageBase::Prefix(config.image_base().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_images_use_image_base() {
        let config = StorefrontConfig::new("https://api.example.com")
            .with_image_base_url("https://img.example.com");
        assert_eq!(
            config_images(&config).resolve("/a.png"),
            "https://img.example.com/a.png"
        );
    }
}
