//! CLI command implementations.

pub mod catalog;
pub mod env;
pub mod home;
pub mod listings;

use anyhow::{anyhow, Result};
use clap::Args;
use market_sdk::market_query::QueryResult;
use market_sdk::prelude::{CategorySort, ListingType};

/// Arguments for the slides command.
#[derive(Args)]
pub struct SlidesArgs {
    /// Include inactive banners.
    #[arg(long)]
    pub include_inactive: bool,

    /// Bypass the banner cache.
    #[arg(long)]
    pub force_refresh: bool,
}

/// Arguments for the categories command.
#[derive(Args)]
pub struct CategoriesArgs {
    /// Client-side ordering: name, popularity or product-count.
    #[arg(long)]
    pub sort_by: Option<CategorySort>,
}

/// Arguments for the featured command.
#[derive(Args)]
pub struct FeaturedArgs {
    /// Number of products to request.
    #[arg(short, long, default_value = "6")]
    pub limit: u32,
}

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search text.
    pub query: String,

    /// Page number, starting at 1.
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Results per page.
    #[arg(short, long, default_value = "20")]
    pub limit: u32,
}

/// Arguments for the listings command.
#[derive(Args)]
pub struct ListingsArgs {
    /// Category slug.
    pub slug: String,

    /// Minimum price.
    #[arg(long, default_value = "0")]
    pub min: f64,

    /// Maximum price.
    #[arg(long, default_value = "9999999")]
    pub max: f64,

    /// Listing type: sale or auction.
    #[arg(long = "type")]
    pub listing_type: Option<ListingType>,
}

/// Arguments for the listing command.
#[derive(Args)]
pub struct ListingArgs {
    /// Listing id.
    pub id: String,
}

/// Data of a finished query, or its error.
pub(crate) fn query_data<T>(result: QueryResult<T>) -> Result<T> {
    match result.data {
        Some(data) => Ok(data),
        None => Err(anyhow!(result
            .error
            .unwrap_or_else(|| "query returned no data".to_string()))),
    }
}
