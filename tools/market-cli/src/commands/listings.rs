//! Listing commands.

use anyhow::{anyhow, Result};
use market_sdk::prelude::{CategoryListingsPage, ListingDetailPage, ListingFilter, ListingId};
use serde_json::json;

use super::{ListingArgs, ListingsArgs};
use crate::context::Context;

/// Render a category's listings after filtering.
pub async fn category(args: ListingsArgs, ctx: &Context) -> Result<()> {
    let mut filter = ListingFilter::default().with_price_range(args.min, args.max);
    if let Some(listing_type) = args.listing_type {
        filter = filter.with_listing_type(listing_type);
    }

    let spinner = ctx.output.spinner(&format!("Fetching {} listings...", args.slug));
    let page = CategoryListingsPage::load(&ctx.queries.services().listings, &args.slug, filter).await;
    spinner.finish_and_clear();

    let listings = page.listings.as_ref().map_err(|e| anyhow!(e.clone()))?;
    ctx.output.success(&format!("{} listings in {}", listings.len(), args.slug));
    ctx.output.emit(listings, || page.render());
    Ok(())
}

/// Render one listing with its seller.
pub async fn detail(args: ListingArgs, ctx: &Context) -> Result<()> {
    let id = ListingId::new(args.id);

    let spinner = ctx.output.spinner(&format!("Fetching listing {}...", id));
    let page = ListingDetailPage::load(&ctx.queries.services().listings, &id).await;
    spinner.finish_and_clear();

    let (listing, seller) = page.listing.as_ref().map_err(|e| anyhow!(e.clone()))?;
    if seller.is_none() {
        ctx.output.warn("Seller not found, showing the fallback dealer");
    }
    ctx.output.emit(&json!({ "listing": listing, "seller": seller }), || page.render());
    Ok(())
}
