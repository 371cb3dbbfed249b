//! Page compositions.
//!
//! Each page loads its data once, concurrently where the pieces are
//! independent, and renders to a full HTML fragment. Section failures
//! degrade to fallbacks; only a page with nothing to show renders the error
//! panel.

use std::panic::{catch_unwind, AssertUnwindSafe};

use market_catalog::{
    sidebar_categories, Category, CategorySort, FeaturedProduct, HeroSlide, ImageBase, Listing,
    ListingCard, ListingFilter, ListingId, Seller,
};
use market_query::StorefrontQueries;
use market_services::{
    CategoryOptions, ListingService, SlideOptions, DEFAULT_FEATURED_LIMIT,
};
use tracing::{error, warn};

use crate::{
    escape_html, render_category_listings, render_category_sidebar, render_featured_grid,
    render_hero_slider, render_listing_card, render_listing_detail, render_more_listings,
    render_promo_card, ImageCarousel, PromoCard, SliderState, SubmenuSelection, ViewState,
};

/// Shown when a category's listings fail to load.
pub const LISTINGS_FAILED: &str = "Failed to load listings.";
/// Shown when a listing fails to load.
pub const LISTING_FAILED: &str = "Failed to load listing or seller.";

// =============================================================================
// Shared screens
// =============================================================================

/// Full-page spinner.
pub fn render_loading_screen() -> String {
    r#"<div class="loading-screen">
    <div class="spinner"></div>
    <h2>Loading arudeal...</h2>
    <p>Please wait while we prepare your shopping experience</p>
</div>"#
        .to_string()
}

/// Full-page error with a retry action.
pub fn render_error_panel(message: &str) -> String {
    format!(
        r#"<div class="error-panel">
    <h2>Unable to Load Content</h2>
    <p>{}</p>
    <button class="retry" data-action="retry">Try Again</button>
    <button class="reload" data-action="reload">Refresh Page</button>
</div>"#,
        escape_html(message)
    )
}

/// Full-page fallback for a renderer that failed.
pub fn render_fallback_page() -> String {
    r#"<div class="fallback-page">
    <h2>Oops! Something went wrong</h2>
    <p>We're having trouble loading the page. Please try refreshing.</p>
    <button class="reload" data-action="reload">Refresh Page</button>
</div>"#
        .to_string()
}

/// Run a renderer, substituting the fallback page if it panics.
pub fn render_or_fallback(render: impl FnOnce() -> String) -> String {
    match catch_unwind(AssertUnwindSafe(render)) {
        Ok(html) => html,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(error = %message, "renderer failed, serving fallback page");
            render_fallback_page()
        }
    }
}

fn render_inline_warning(message: &str) -> String {
    format!(
        r#"<div class="inline-warning" role="alert">
    <p>Some content couldn't be loaded. {}</p>
    <button class="retry" data-action="retry">Retry</button>
    <button class="dismiss" data-action="dismiss" aria-label="Dismiss">&times;</button>
</div>"#,
        escape_html(message)
    )
}

// =============================================================================
// Home
// =============================================================================

/// What the home page shows as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeOutcome {
    Loading,
    /// Nothing loaded and something failed.
    Failed(String),
    /// Content, with a dismissible warning when part of it failed.
    Ready { warning: Option<String> },
}

/// Everything the home page renders.
#[derive(Debug, Clone)]
pub struct HomePage {
    pub hero_slides: Vec<HeroSlide>,
    pub promo: Option<PromoCard>,
    /// Categories from the main API. Only used to decide whether the page
    /// has data; the sidebar shows its own set.
    pub categories: Vec<Category>,
    pub sidebar: ViewState<Vec<Category>>,
    pub featured: ViewState<Vec<FeaturedProduct>>,
    pub featured_failed: bool,
    /// Cards of every listing section, flattened in section order.
    pub listings: Vec<ListingCard>,
    pub slider: SliderState,
    pub selection: SubmenuSelection,
    is_loading: bool,
    error: Option<String>,
    images: ImageBase,
}

impl HomePage {
    /// Slide query used by the home page: active banners only.
    pub fn slide_options() -> SlideOptions {
        SlideOptions::new()
            .with_include_inactive(false)
            .with_active_filter(true)
    }

    /// Category query used by the home page: counted, most popular first.
    pub fn category_options() -> CategoryOptions {
        CategoryOptions::new()
            .with_product_count()
            .sorted_by(CategorySort::Popularity)
    }

    /// Load banners, featured products, vehicle types and listing sections
    /// concurrently. Banner images resolve against `images`.
    pub async fn load(queries: &StorefrontQueries, images: ImageBase) -> Self {
        let slide_options = Self::slide_options();
        let category_options = Self::category_options();
        let listings = queries.services().listings.clone();

        let (banners, featured, vehicle_types, sections) = futures::join!(
            queries.banner_data_with(&slide_options, &category_options),
            queries.featured_products(DEFAULT_FEATURED_LIMIT),
            queries.vehicle_types(),
            listings.listing_sections(),
        );

        let slides: Vec<HeroSlide> = banners
            .hero_slides
            .into_iter()
            .map(HeroSlide::with_default_gradient)
            .collect();
        let promo = PromoCard::from_slides(&slides);
        let hero_slides: Vec<HeroSlide> = slides.into_iter().filter(HeroSlide::is_hero).collect();

        let listings = match sections {
            Ok(sections) => sections.into_iter().flat_map(|s| s.listings).collect(),
            Err(e) => {
                warn!(error = %e, "listing sections unavailable");
                Vec::new()
            }
        };

        let sidebar = ViewState::from_items(
            banners.is_loading || vehicle_types.is_loading(),
            sidebar_categories(&vehicle_types.data.unwrap_or_default()),
        );

        Self {
            slider: SliderState::new(hero_slides.len()),
            hero_slides,
            promo,
            categories: banners.categories,
            sidebar,
            featured: ViewState::from_query(&featured),
            featured_failed: featured.is_error(),
            listings,
            selection: SubmenuSelection::default(),
            is_loading: banners.is_loading && featured.is_loading(),
            error: featured.error.or(banners.error),
            images,
        }
    }

    /// Hero slides or categories came back.
    pub fn has_data(&self) -> bool {
        !self.hero_slides.is_empty() || !self.categories.is_empty()
    }

    pub fn outcome(&self) -> HomeOutcome {
        if self.is_loading {
            return HomeOutcome::Loading;
        }
        match &self.error {
            Some(message) if !self.has_data() => HomeOutcome::Failed(message.clone()),
            warning => HomeOutcome::Ready {
                warning: warning.clone(),
            },
        }
    }

    /// Render the page.
    ///
    /// The first listing card sits under the sidebar, the second in the
    /// featured grid and the rest in the "More Listings" strip.
    pub fn render(&self) -> String {
        let warning = match self.outcome() {
            HomeOutcome::Loading => return render_loading_screen(),
            HomeOutcome::Failed(message) => return render_error_panel(&message),
            HomeOutcome::Ready { warning } => warning,
        };

        let warning = warning.map(|w| render_inline_warning(&w)).unwrap_or_default();
        let mut cards = self.listings.iter();
        let sidebar_card = cards.next().map(render_listing_card).unwrap_or_default();
        let featured_card = cards.next().map(render_listing_card).unwrap_or_default();
        let rest: Vec<&ListingCard> = cards.collect();

        let hero = if self.hero_slides.is_empty() {
            r#"<div class="empty-state" data-section="hero">
        <h3>No Hero Banners Available</h3>
        <p>Check back later for featured content</p>
    </div>"#
                .to_string()
        } else {
            render_hero_slider(
                &ViewState::Ready(self.hero_slides.clone()),
                &self.slider,
                &self.images,
            )
        };
        let promo = self
            .promo
            .as_ref()
            .map(|card| render_promo_card(card, &self.images))
            .unwrap_or_default();

        let featured_error = if self.featured_failed && self.featured.ready().is_none() {
            r#"<div class="section-error"><p>Failed to load featured products</p><button class="retry" data-action="refresh-featured">Try Again</button></div>"#
        } else {
            ""
        };

        format!(
            r#"<div class="home-page">
{warning}
<div class="home-layout">
    <div class="home-aside">
        {sidebar}
        {sidebar_card}
    </div>
    <div class="home-main">
        <div class="home-banners">
            {hero}
            {promo}
        </div>
        <div class="home-featured">
            {featured}
            {featured_error}
            {featured_card}
        </div>
        {more}
    </div>
</div>
</div>"#,
            warning = warning,
            sidebar = render_category_sidebar(&self.sidebar, &self.selection),
            sidebar_card = sidebar_card,
            hero = hero,
            promo = promo,
            featured = render_featured_grid(&self.featured),
            featured_error = featured_error,
            featured_card = featured_card,
            more = render_more_listings(&rest)
        )
    }
}

// =============================================================================
// Category listings
// =============================================================================

/// Listings of one category after filtering.
#[derive(Debug, Clone)]
pub struct CategoryListingsPage {
    pub slug: String,
    pub filter: ListingFilter,
    pub listings: Result<Vec<Listing>, String>,
    images: ImageBase,
}

impl CategoryListingsPage {
    pub async fn load(service: &ListingService, slug: &str, filter: ListingFilter) -> Self {
        let listings = service
            .listings_for_category(slug, &filter)
            .await
            .map_err(|e| {
                warn!(slug, error = %e, "category listings unavailable");
                LISTINGS_FAILED.to_string()
            });
        Self {
            slug: slug.to_string(),
            filter,
            listings,
            images: service.listing_images(),
        }
    }

    pub fn render(&self) -> String {
        match &self.listings {
            Ok(listings) => render_category_listings(
                &self.slug,
                &ViewState::from_items(false, listings.clone()),
                &self.images,
            ),
            Err(message) => format!(
                r#"<div class="section-error">{}</div>"#,
                escape_html(message)
            ),
        }
    }
}

// =============================================================================
// Listing detail
// =============================================================================

/// One listing with its seller and image carousel.
#[derive(Debug, Clone)]
pub struct ListingDetailPage {
    pub listing: Result<(Listing, Option<Seller>), String>,
    pub carousel: ImageCarousel,
    images: ImageBase,
}

impl ListingDetailPage {
    pub async fn load(service: &ListingService, id: &ListingId) -> Self {
        let images = service.listing_images();
        match service.listing_detail(id).await {
            Ok(detail) => Self {
                carousel: ImageCarousel::new(detail.listing.images.clone()),
                listing: Ok((detail.listing, detail.seller)),
                images,
            },
            Err(e) => {
                warn!(listing_id = %id, error = %e, "listing unavailable");
                Self {
                    listing: Err(LISTING_FAILED.to_string()),
                    carousel: ImageCarousel::default(),
                    images,
                }
            }
        }
    }

    pub fn render(&self) -> String {
        match &self.listing {
            Ok((listing, seller)) => {
                render_listing_detail(listing, seller.as_ref(), &self.carousel, &self.images)
            }
            Err(message) => format!(
                r#"<div class="section-error">{}</div>"#,
                escape_html(message)
            ),
        }
    }
}
