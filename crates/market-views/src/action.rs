//! Click handling.
//!
//! Handlers do not touch the page; they return the actions the host should
//! carry out, in order.

use std::fmt;

use market_catalog::{Category, CategoryId, SlideId, CARS_CATEGORY_ID};
use market_services::Storefront;
use serde_json::{json, Map, Value};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::SubmenuSelection;

/// Where a tracked click came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackSource {
    HeroSlider,
    PromoCard,
}

impl TrackSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HeroSlider => "hero-slider",
            Self::PromoCard => "promo-card",
        }
    }
}

impl fmt::Display for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something the host does in response to a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// Route within the storefront.
    Navigate(String),
    /// Open a URL in a new browsing context.
    OpenExternal(String),
    /// Record a banner click. Fire and forget.
    Track {
        banner_id: SlideId,
        source: TrackSource,
    },
    /// Expand or collapse a category's submenu.
    ToggleSubmenu(CategoryId),
}

/// Click on a banner: track it, then open its link when it has one.
pub fn banner_click(banner_id: &SlideId, link: &str, source: TrackSource) -> Vec<ClickAction> {
    let mut actions = vec![ClickAction::Track {
        banner_id: banner_id.clone(),
        source,
    }];
    if !link.trim().is_empty() {
        actions.push(ClickAction::OpenExternal(link.to_string()));
    }
    actions
}

/// Click on a sidebar category.
///
/// A category with subcategories toggles its submenu in `selection`;
/// any other opens its link.
pub fn category_click(category: &Category, selection: &mut SubmenuSelection) -> Option<ClickAction> {
    if category.expands() {
        selection.toggle(&category.id);
        return Some(ClickAction::ToggleSubmenu(category.id.clone()));
    }
    category.link.clone().map(ClickAction::OpenExternal)
}

/// Click on a subcategory.
///
/// Cars subcategories open their own listing page; every other
/// subcategory opens its parent's link.
pub fn subcategory_click(category: &Category, subcategory_id: &CategoryId) -> Option<ClickAction> {
    let sub = category.subcategory(subcategory_id)?;
    let link = if category.id == CategoryId::from(CARS_CATEGORY_ID) {
        sub.link.clone().or_else(|| category.link.clone())
    } else {
        category.link.clone()
    };
    link.map(ClickAction::OpenExternal)
}

/// Click on "View all" under an expanded category.
pub fn view_all_click(category: &Category) -> Option<ClickAction> {
    category.link.clone().map(ClickAction::OpenExternal)
}

/// Click on a listing card.
pub fn listing_click(listing_id: &str) -> ClickAction {
    ClickAction::Navigate(format!("/listing-detail/{}", listing_id))
}

/// Click on a product card. Products without a link do nothing.
pub fn product_click(link: Option<&str>) -> Option<ClickAction> {
    link.filter(|l| !l.trim().is_empty())
        .map(|l| ClickAction::OpenExternal(l.to_string()))
}

fn metadata(source: TrackSource, timestamp: i64, position: Option<usize>) -> Map<String, Value> {
    let mut meta = Map::new();
    meta.insert("source".into(), json!(source.as_str()));
    meta.insert("timestamp".into(), json!(timestamp));
    if let Some(position) = position {
        meta.insert("position".into(), json!(position));
    }
    meta
}

/// Send the analytics call of a `Track` action in the background.
///
/// Returns `None` for every other action. The outcome is only logged.
pub fn dispatch_tracking(storefront: &Storefront, action: &ClickAction) -> Option<JoinHandle<()>> {
    let ClickAction::Track { banner_id, source } = action else {
        return None;
    };
    let banners = storefront.banners.clone();
    let id = banner_id.clone();
    let meta = metadata(*source, storefront.clock().now_millis(), None);
    let source = *source;
    Some(tokio::spawn(async move {
        let result = banners.track_banner_click(&id, Some(meta)).await;
        debug!(banner_id = %id, %source, success = result.success, "banner click tracked");
    }))
}

/// Send a banner impression in the background.
pub fn dispatch_impression(
    storefront: &Storefront,
    banner_id: &SlideId,
    position: usize,
) -> JoinHandle<()> {
    let banners = storefront.banners.clone();
    let id = banner_id.clone();
    let meta = metadata(
        TrackSource::HeroSlider,
        storefront.clock().now_millis(),
        Some(position),
    );
    tokio::spawn(async move {
        let result = banners.track_banner_impression(&id, Some(meta)).await;
        debug!(banner_id = %id, position, success = result.success, "banner impression tracked");
    })
}
