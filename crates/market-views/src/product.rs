//! Product cards and the featured grid.

use market_catalog::{has_valid_price, FeaturedProduct, MainProduct};

use crate::{escape_html, ViewState};

/// Slots in the featured grid, loaded or not.
pub const FEATURED_GRID_SLOTS: usize = 6;

/// Render the featured-product grid.
pub fn render_featured_grid(state: &ViewState<Vec<FeaturedProduct>>) -> String {
    let body = match state {
        ViewState::Loading => {
            let cards: String = (0..FEATURED_GRID_SLOTS).map(|_| render_card_skeleton()).collect();
            format!(r#"<div class="product-grid product-grid--loading">{}</div>"#, cards)
        }
        ViewState::Empty => r#"<div class="empty-state">
        <h3>No Featured Products Available</h3>
        <p>Check back later for featured products</p>
    </div>"#
            .to_string(),
        ViewState::Ready(products) => {
            let cards: String = products.iter().map(render_featured_card).collect();
            format!(r#"<div class="product-grid">{}</div>"#, cards)
        }
    };

    format!(
        r#"<section class="featured-products" data-section="featured">
    <h3 class="section-title">Featured Products</h3>
    {body}
</section>"#,
        body = body
    )
}

/// Render one featured product.
pub fn render_featured_card(product: &FeaturedProduct) -> String {
    let prices = render_prices(
        product.price.as_deref().unwrap_or(""),
        product.original_price.as_deref().unwrap_or(""),
    );
    let discount = product
        .discount
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| format!(r#"<span class="product-discount">{}</span>"#, escape_html(d)))
        .unwrap_or_default();

    format!(
        r#"<div class="product-card" data-product-id="{id}">
    {image}{discount}
    <h4 class="product-name">{name}</h4>
    {prices}
</div>"#,
        id = product.id,
        image = render_image(&product.image, &product.name),
        discount = discount,
        name = escape_html(&product.name),
        prices = prices
    )
}

/// Render a full product card with rating.
pub fn render_product_card(product: &MainProduct) -> String {
    let stars: String = (0..5)
        .map(|i| {
            if i < product.filled_stars() {
                r#"<span class="star star--filled">&#9733;</span>"#
            } else {
                r#"<span class="star">&#9734;</span>"#
            }
        })
        .collect();
    let badge = product
        .badge
        .as_deref()
        .map(|b| format!(r#"<span class="product-badge">{}</span>"#, escape_html(b)))
        .unwrap_or_default();
    let favorite = if product.is_favorite {
        r#"<span class="product-favorite" aria-label="In favorites">&#9829;</span>"#
    } else {
        ""
    };

    format!(
        r#"<div class="product-card" data-product-id="{id}">
    {image}{badge}{favorite}
    <h4 class="product-name">{name}</h4>
    <div class="product-rating">{stars}<span class="review-count">({reviews})</span></div>
    {prices}
</div>"#,
        id = product.id,
        image = render_image(&product.image, &product.name),
        badge = badge,
        favorite = favorite,
        name = escape_html(&product.name),
        stars = stars,
        reviews = product.reviews,
        prices = render_prices(&product.price, &product.original_price)
    )
}

/// Price block. Missing or zero prices are left out; with neither price the
/// card says so.
fn render_prices(price: &str, original: &str) -> String {
    let mut out = String::new();
    if has_valid_price(price) {
        out.push_str(&format!(
            r#"<span class="price-current">{}</span>"#,
            escape_html(price)
        ));
    }
    if has_valid_price(original) {
        out.push_str(&format!(
            r#"<span class="price-original">{}</span>"#,
            escape_html(original)
        ));
    }
    if out.is_empty() {
        out.push_str(r#"<span class="price-unavailable">Price on request</span>"#);
    }
    format!(r#"<div class="product-prices">{}</div>"#, out)
}

fn render_image(src: &str, name: &str) -> String {
    if src.is_empty() {
        return r#"<div class="product-image-placeholder"></div>"#.to_string();
    }
    let alt = if name.is_empty() { "Product image" } else { name };
    format!(
        r#"<img src="{}" alt="{}" class="product-image" loading="lazy">"#,
        escape_html(src),
        escape_html(alt)
    )
}

fn render_card_skeleton() -> String {
    r#"<div class="product-card skeleton"><div class="skeleton-image"></div><div class="skeleton-line"></div><div class="skeleton-line skeleton-line--short"></div></div>"#
        .to_string()
}
