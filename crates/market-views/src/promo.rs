//! Promo card.

use market_catalog::{HeroSlide, ImageBase, SlideId};

use crate::escape_html;

/// The card built from the first promotional banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoCard {
    pub id: SlideId,
    pub title: String,
    /// The banner's discount, or "Special Price".
    pub price: String,
    /// The banner's subtitle, or "Special Offer".
    pub badge: String,
    pub image: String,
    pub bg_gradient: String,
    pub link: String,
}

impl PromoCard {
    /// Card for the first promotional slide. No promotional slide, no card.
    pub fn from_slides(slides: &[HeroSlide]) -> Option<Self> {
        let slide = slides.iter().find(|s| s.is_promotional())?;
        Some(Self {
            id: slide.id.clone(),
            title: slide.title.clone(),
            price: or_default(&slide.discount, "Special Price"),
            badge: or_default(&slide.subtitle, "Special Offer"),
            image: slide.image.clone(),
            bg_gradient: slide.bg_gradient.clone(),
            link: slide.link.clone(),
        })
    }
}

fn or_default(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Render the promo card.
pub fn render_promo_card(card: &PromoCard, images: &ImageBase) -> String {
    let image = if card.image.is_empty() {
        String::new()
    } else {
        format!(
            r#"<img src="{}" alt="{}" class="promo-image" loading="lazy">"#,
            escape_html(&images.resolve(&card.image)),
            escape_html(&card.title)
        )
    };

    format!(
        r#"<div class="promo-card bg-gradient-to-r {gradient}" data-section="promo" data-banner-id="{id}" role="button">
    <span class="promo-badge">{badge}</span>
    <span class="promo-price-label">Price Just</span>
    <div class="promo-price">{price}</div>
    <h3 class="promo-title">{title}</h3>
    <span class="promo-cta">Shop Now</span>
    {image}
</div>"#,
        gradient = escape_html(&card.bg_gradient),
        id = escape_html(card.id.as_str()),
        badge = escape_html(&card.badge),
        price = escape_html(&card.price),
        title = escape_html(&card.title),
        image = image
    )
}

/// Skeleton with the promo card's shape.
pub fn render_promo_skeleton() -> String {
    r#"<div class="promo-card promo-card--loading" data-section="promo">
    <div class="skeleton-line skeleton-badge"></div>
    <div class="skeleton-line skeleton-price"></div>
    <div class="skeleton-line skeleton-title"></div>
    <div class="skeleton-image"></div>
</div>"#
        .to_string()
}
