//! Home page command.

use anyhow::Result;
use market_sdk::market_views::HomeOutcome;
use market_sdk::prelude::{render_or_fallback, HomePage};
use market_sdk::config_images;
use serde::Serialize;

use crate::context::Context;
use crate::output::status_badge;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HomeSummary {
    status: &'static str,
    warning: Option<String>,
    hero_slides: usize,
    has_promo: bool,
    categories: usize,
    featured: usize,
    listings: usize,
}

/// Render the home page.
pub async fn run(ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading home page...");
    let page = HomePage::load(&ctx.queries, config_images(&ctx.config)).await;
    spinner.finish_and_clear();

    let (status, warning) = match page.outcome() {
        HomeOutcome::Loading => ("loading", None),
        HomeOutcome::Failed(message) => ("failed", Some(message)),
        HomeOutcome::Ready { warning: Some(w) } => ("partial", Some(w)),
        HomeOutcome::Ready { warning: None } => ("ready", None),
    };

    let summary = HomeSummary {
        status,
        warning: warning.clone(),
        hero_slides: page.hero_slides.len(),
        has_promo: page.promo.is_some(),
        categories: page.categories.len(),
        featured: page.featured.ready().map(Vec::len).unwrap_or(0),
        listings: page.listings.len(),
    };

    ctx.output.header("Home page");
    ctx.output.kv("Status", &status_badge(status));
    if let Some(warning) = &warning {
        ctx.output.warn(warning);
    }
    ctx.output.kv("Hero slides", &summary.hero_slides.to_string());
    ctx.output.kv("Featured products", &summary.featured.to_string());
    ctx.output.kv("Listing cards", &summary.listings.to_string());

    ctx.output.emit(&summary, || render_or_fallback(|| page.render()));
    Ok(())
}
