//! Banner, category and product commands.

use anyhow::Result;
use market_sdk::config_images;
use market_sdk::market_views::{
    render_category_sidebar, render_featured_grid, render_hero_slider, render_product_card,
    SliderState, SubmenuSelection, ViewState,
};
use market_sdk::prelude::{CategoryOptions, SlideOptions, StorefrontQueries};
use tracing::debug;

use super::{query_data, CategoriesArgs, FeaturedArgs, SearchArgs, SlidesArgs};
use crate::context::Context;

/// Render the hero slider.
pub async fn slides(args: SlidesArgs, ctx: &Context) -> Result<()> {
    let mut options = SlideOptions::new();
    if args.include_inactive {
        options = options.with_include_inactive(true);
    }
    if args.force_refresh {
        options = options.with_force_refresh();
    }

    let spinner = ctx.output.spinner("Fetching hero slides...");
    let result = ctx.queries.hero_slides(&options).await;
    spinner.finish_and_clear();

    let slides = query_data(result)?;
    debug!(count = slides.len(), "hero slides loaded");
    ctx.output.emit(&slides, || {
        let slider = SliderState::new(slides.len());
        render_hero_slider(
            &ViewState::from_items(false, slides.clone()),
            &slider,
            &config_images(&ctx.config),
        )
    });
    Ok(())
}

/// Render categories from the API as a sidebar.
pub async fn categories(args: CategoriesArgs, ctx: &Context) -> Result<()> {
    let options = match args.sort_by {
        Some(sort) => CategoryOptions::new().with_product_count().sorted_by(sort),
        None => CategoryOptions::new().with_product_count(),
    };

    let spinner = ctx.output.spinner("Fetching categories...");
    let result = ctx.queries.categories(&options).await;
    spinner.finish_and_clear();

    let categories = query_data(result)?;
    ctx.output.emit(&categories, || {
        render_category_sidebar(
            &ViewState::from_items(false, categories.clone()),
            &SubmenuSelection::default(),
        )
    });
    Ok(())
}

/// Render the featured-product grid.
pub async fn featured(args: FeaturedArgs, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Fetching featured products...");
    let result = ctx.queries.featured_products(args.limit).await;
    spinner.finish_and_clear();

    let products = query_data(result)?;
    ctx.output.emit(&products, || {
        render_featured_grid(&ViewState::from_items(false, products.clone()))
    });
    Ok(())
}

/// Render one page of search results.
pub async fn search(args: SearchArgs, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner(&format!("Searching for \"{}\"...", args.query));
    let result = ctx
        .queries
        .search_products(&args.query, args.page, args.limit)
        .await;
    spinner.finish_and_clear();

    if result.data.is_none() && result.error.is_none() {
        ctx.output.warn("Nothing to search for.");
        return Ok(());
    }

    let envelope = query_data(result)?;
    let products = envelope.data.clone().unwrap_or_default();
    let next = StorefrontQueries::next_search_page(&products, args.page, args.limit);
    match next {
        Some(page) => ctx.output.info(&format!("More results on page {}", page)),
        None => ctx.output.info("Last page of results"),
    }

    ctx.output.emit(&envelope, || {
        let cards: String = products.iter().map(render_product_card).collect();
        format!(
            r#"<section class="search-results" data-section="search"><div class="product-grid">{}</div></section>"#,
            cards
        )
    });
    Ok(())
}
