//! Prelude for convenient imports.
//!
//! ```rust,ignore
//! use market_sdk::prelude::*;
//! ```
//!
//! This imports the items a storefront host needs:
//! - Config and logging: `StorefrontConfig`, `LoggingSetup`
//! - Services: `Storefront` and its option builders
//! - Queries: `StorefrontQueries`, `QueryResult`
//! - Domain types: slides, categories, products, listings
//! - Views: pages, renderers and click actions

// Config, clock and logging
pub use market_core::{Clock, ConfigError, SharedClock, StorefrontConfig, SystemClock};
pub use market_observability::{LogFormat, LogLevel, LoggingSetup};

// Transport
pub use market_data::{ApiClient, FetchError, RetryPolicy, Transport};

// Services
pub use market_services::{
    CategoryOptions, ListingService, ServiceError, SlideOptions, Storefront,
};

// Queries
pub use market_query::{QueryClient, QueryOptions, QueryResult, StorefrontQueries};

// Domain types
pub use market_catalog::{
    Category, CategoryId, CategorySort, FeaturedProduct, HeroSlide, ImageBase, Listing,
    ListingFilter, ListingId, ListingType, MainProduct, Seller, SlideId,
};

// Views
pub use market_views::{
    render_or_fallback, CategoryListingsPage, ClickAction, HomePage, ListingDetailPage,
    SubmenuSelection, ViewState,
};

pub use crate::config_images;
