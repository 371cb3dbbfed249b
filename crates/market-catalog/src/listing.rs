//! Marketplace listings and sellers.
//!
//! The listing service returns everything unfiltered; category filtering,
//! price filtering and the listing/seller join all happen here.

use serde::{Deserialize, Serialize};

use crate::ids::{ListingId, SectionId, SellerId};
use crate::image::ImageBase;

/// Seller name shown when a listing's seller cannot be found.
pub const FALLBACK_SELLER_NAME: &str = "System Admin";

/// Category embedded in a listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingCategory {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

/// How a listing is sold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ListingType {
    #[default]
    Sale,
    Auction,
    Other(String),
}

impl ListingType {
    /// Wire name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sale => "sale",
            Self::Auction => "auction",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ListingType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "sale" => Self::Sale,
            "auction" => Self::Auction,
            _ => Self::Other(s),
        }
    }
}

impl From<ListingType> for String {
    fn from(t: ListingType) -> Self {
        t.as_str().to_string()
    }
}

impl std::str::FromStr for ListingType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

/// A marketplace listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: ListingId,
    #[serde(default)]
    pub listing_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(rename = "categoryId", default)]
    pub category: Option<ListingCategory>,
    #[serde(default)]
    pub listing_type: ListingType,
    #[serde(default)]
    pub seller_id: Option<SellerId>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Listing {
    /// Slug of the embedded category, if any.
    pub fn category_slug(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.slug.as_str())
    }

    /// True when the listing's category slug matches, ignoring case.
    pub fn in_category(&self, slug: &str) -> bool {
        self.category_slug()
            .map(|s| s.eq_ignore_ascii_case(slug))
            .unwrap_or(false)
    }

    /// Creation date as `YYYY-MM-DD`, when the timestamp parses.
    pub fn listed_on(&self) -> Option<String> {
        let raw = self.created_at.as_deref()?;
        chrono::DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.format("%Y-%m-%d").to_string())
    }
}

/// A seller from the listing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    #[serde(rename = "_id")]
    pub id: SellerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Find a listing's seller by scanning the full seller list.
pub fn find_seller<'a>(listing: &Listing, sellers: &'a [Seller]) -> Option<&'a Seller> {
    let wanted = listing.seller_id.as_ref()?;
    sellers.iter().find(|s| &s.id == wanted)
}

/// Listings whose category slug matches, ignoring case.
pub fn filter_by_category_slug(listings: &[Listing], slug: &str) -> Vec<Listing> {
    listings
        .iter()
        .filter(|l| l.in_category(slug))
        .cloned()
        .collect()
}

/// Price and type filter applied on the category page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFilter {
    /// Inclusive lower price bound.
    pub price_min: f64,
    /// Inclusive upper price bound.
    pub price_max: f64,
    /// Only this listing type, when set.
    pub listing_type: Option<ListingType>,
}

impl Default for ListingFilter {
    fn default() -> Self {
        Self {
            price_min: 0.0,
            price_max: 9_999_999.0,
            listing_type: None,
        }
    }
}

impl ListingFilter {
    /// Set the price range.
    pub fn with_price_range(mut self, min: f64, max: f64) -> Self {
        self.price_min = min;
        self.price_max = max;
        self
    }

    /// Restrict to one listing type.
    pub fn with_listing_type(mut self, listing_type: ListingType) -> Self {
        self.listing_type = Some(listing_type);
        self
    }

    /// Check a single listing.
    pub fn matches(&self, listing: &Listing) -> bool {
        listing.price >= self.price_min
            && listing.price <= self.price_max
            && self
                .listing_type
                .as_ref()
                .map(|t| &listing.listing_type == t)
                .unwrap_or(true)
    }

    /// Apply to a list.
    pub fn apply(&self, listings: &[Listing]) -> Vec<Listing> {
        listings.iter().filter(|l| self.matches(l)).cloned().collect()
    }
}

/// A homepage section configured on the listing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSection {
    #[serde(rename = "_id")]
    pub id: SectionId,
    pub title: String,
    /// Category slug the section draws from.
    pub category: String,
    /// Maximum number of cards.
    #[serde(default)]
    pub card_limit: usize,
}

/// Card shown inside a listing section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingCard {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub image: String,
}

impl ListingCard {
    /// Build a card, resolving the first image.
    pub fn from_listing(listing: &Listing, images: &ImageBase) -> Self {
        let first = listing.images.first().map(String::as_str).unwrap_or("");
        Self {
            id: listing.id.clone(),
            title: listing.title.clone(),
            description: listing.description.clone(),
            price: listing.price,
            image: images.resolve(first),
        }
    }
}

/// A section with its cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionListings {
    pub section: ListingSection,
    pub listings: Vec<ListingCard>,
}

impl SectionListings {
    /// Keep the first `card_limit` listings of a section.
    pub fn build(section: ListingSection, listings: &[Listing], images: &ImageBase) -> Self {
        let cards = listings
            .iter()
            .take(section.card_limit)
            .map(|l| ListingCard::from_listing(l, images))
            .collect();
        Self {
            section,
            listings: cards,
        }
    }
}

/// Format a price with thousands separators, e.g. `1,250,000` or `99.5`.
pub fn format_price(price: f64) -> String {
    let negative = price < 0.0;
    let rounded = (price.abs() * 100.0).round() / 100.0;
    let whole = rounded.trunc() as u64;
    let cents = ((rounded - rounded.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = if negative { format!("-{}", grouped) } else { grouped };
    if cents > 0 {
        let frac = format!("{:02}", cents);
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
    out
}
