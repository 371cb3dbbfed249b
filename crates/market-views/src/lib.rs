//! Storefront views.
//!
//! Renderers are plain functions from loaded data to HTML strings, so a
//! section can be rendered, tested or swapped for its fallback on its own.
//!
//! This crate provides:
//! - `ViewState` - Loading, empty or ready, derived from a query result
//! - `render_hero_slider` / `SliderState` / `ImageCarousel` - Slides and galleries that wrap around
//! - `render_promo_card` - The first promotional banner
//! - `render_category_sidebar` / `SubmenuSelection` - Categories with one expanded submenu
//! - `render_featured_grid` / `render_product_card` - Product cards with price rules
//! - `render_listing_card` / `render_listing_detail` - Listing cards, sections and detail
//! - `ClickAction` - What a click does, including fire-and-forget analytics
//! - `HomePage` / `CategoryListingsPage` / `ListingDetailPage` - Whole pages with error fallbacks

mod action;
mod escape;
mod listing;
mod page;
mod product;
mod promo;
mod sidebar;
mod slider;
mod state;

pub use action::*;
pub use escape::escape_html;
pub use listing::*;
pub use page::*;
pub use product::*;
pub use promo::*;
pub use sidebar::*;
pub use slider::*;
pub use state::*;
